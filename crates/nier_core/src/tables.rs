//! Ordered name lists for every enumerated domain in a save. Position in a
//! list is the stored code unless a layout says otherwise; `""` marks a
//! position with no known name.

/// Map items in inventory order.
pub const MAPS: &[&str] = &[
    "World Map", "_unknown_0", "_unknown_1", "Central Village Map", "Lost Shrine Area Map",
    "Lost Shrine Map", "The Aerie Map", "Seafront Map", "Desert Map", "Facade Map",
    "Barren Temple Map", "Junk Heap Area Map", "Junk Heap Map", "Manor Map", "Forest of Myth Map",
    "Underground Facility Map", "_unknown_2", "Shadowlord's Castle Map", "_unknown_3",
    "Northern Plains Map", "Southern Plains Map", "Eastern Road Map",
    "Beneath the Forest of Myth Map", "Toyko Map",
];

/// Zone key (the middle of a map identifier such as `A_CENTER_VILLAGE_01`) to display name.
pub const MAP_ZONES: &[(&str, &str)] = &[
    ("CENTER_VILLAGE", "NieR's Village"),
    ("CENTER_LIBRARY", "Library"),
    ("CLIFF_VILLAGE", "The Aerie"),
    ("STONE_TEMPLE", "Lost Shrine"),
    ("SEASIDE_TOWN", "Seafront"),
    ("DESERT_FIELD", "Desert"),
    ("DESERT_TOWN", "Facade"),
    ("DESERT_TEMPLE", "Barren Temple"),
    ("MOUNT_ROBOT", "Junk Heap"),
    ("SOUTH_MANSION", "Manor"),
    ("FOREST_FIELD", "Forest of Myth"),
    ("SOUTH_UNDERGROUND", "Underground Facility"),
    ("CASTLE_FIELD", "Shadowlord's Castle"),
    ("NORTH_FIELD", "Northern Plains"),
    ("SOUTH_FIELD", "Southern Plains"),
    ("EAST_FIELD", "Eastern Road"),
    ("TOKYO_FIELD", "Toyko"),
];

pub const ABILITIES: &[&str] = &[
    "None", "Defend", "Evade", "Dark Blast", "Dark Phantasm", "Dark Hand", "Dark Lance",
    "Dark Whirlwind", "Dark Gluttony", "Dark Wall", "Dark Execution",
];

/// One-handed swords, stored from code 0.
pub const SWORDS_1H: &[&str] = &[
    "Nameless Blade", "Phoenix Dagger", "Beastbain", "Labyrinth's Whisper", "Fool's Embrace",
    "Ancient Overlord", "Rebirth", "Earth Wyrms Claw", "Nirvana Dagger", "Moonrise",
    "Blade of Treachery", "Lily Leaf Sword", "Faith", "Iron Pipe", "Kainé's Sword",
    "Virtuous Contract", "Cruel Oath",
];

/// Two-handed swords, stored from code 20.
pub const SWORDS_2H: &[&str] = &[
    "Kusanagi", "Phoenix Sword", "Beastlord", "Labyrinth's Song", "Fool's Lament",
    "Fang of the Twins", "Axe of Beheading", "Vile Axe", "Iron Will", "Virtuous Treaty",
];

/// Spears, stored from code 40.
pub const SPEARS: &[&str] = &[
    "Transience", "Phoenix Spear", "Beastcurse", "Labyrinth's Shout", "Fool's Accord",
    "The Devil Queen", "Sunrise", "Spear of the Usurper", "Dragoon Lance", "Captain's Holy Spear",
    "Virtuous Dignity",
];

pub const WORDS: &[&str] = &[
    "Pah", "Paha", "Pahi", "Paho", "Pahu", "Pahal", "Pahil", "Pahol", "Pahul", "Pahuloth", "Var",
    "Vara", "Vari", "Varo", "Varu", "Varal", "Varil", "Varol", "Varul", "Varuloth", "Geb", "Geba",
    "Gebi", "Gebo", "Gebu", "Gebal", "Gebil", "Gebol", "Gebul", "Gebuloth", "Ul", "Ula", "Uli",
    "Ulo", "Ulu", "Ulal", "Ulil", "Ulol", "Ulul", "Ululoth", "Hod", "Hoda", "Hodi", "Hodo", "Hodu",
    "Hodal", "Hodil", "Hodol", "Hodul", "Hoduloth", "Bes", "Besa", "Besi", "Beso", "Besu", "Besal",
    "Besil", "Besol", "Besul", "Besuloth", "", "", "", "", "Lug", "Lugir", "Luges", "Lugka",
    "Lugza", "Lugira", "Lugesra", "Lugkarr", "Lugzarr", "Lugzarken", "Ot", "Otir", "Otes", "Otka",
    "Otza", "Otira", "Otesra", "Otkarr", "Otzarr", "Otzarken", "Mah", "Mahir", "Mahes", "Mahka",
    "Mahza", "Mahira", "Mahesra", "Mahkarr", "Mahzarr", "Mahzarken", "Ashur", "Ashurir", "Ashures",
    "Ashurka", "Ashurza", "Ashurira", "Ashuresra", "Ashurkarr", "Ashurzarr", "Ashurzarken", "Kon",
    "Konir", "Kones", "Konka", "Konza", "Konira", "Konesra", "Konkarr", "Konzarr", "Konzarken",
    "Sol", "Solir", "Soles", "Solka", "Solza", "Solira", "Solesra", "Solkarr", "Solzarr",
    "Solzarken", "Ashurfarra", "", "", "",
];

pub const TUTORIALS: &[&str] = &[
    "Controls", "Combos", "Dark Blast", "Dark Phantasm", "Dark Hand", "Dark Lance",
    "Dark Whirlwind", "Dark Gluttony", "Dark Wall", "Dark Execution", "Maps", "Interactions",
    "Attack Gauges", "Saving", "Quests", "Weapon Types", "Cultivating Plants", "Forging Weapons",
    "Shops", "Mine Carts", "Switching Magic and Abilities", "", "Viewing Letters",
    "Changing Weapons", "Moving Boxes", "", "Charging", "", "Skull Cracker", "Deflecting", "", "",
    "", "Sidestepping", "Sidestep Attacks", "Combo and Magic Charging", "Magic Resistance",
    "Cancels", "", "", "Guard Breaks", "Heavy Attack Guard Breaks", "Earning Money", "Fishing Tip",
    "Fishing Tip 2", "Fishing Tip 3", "Fishing Tip 4", "Fishing Tip 5", "Armored Enemies",
    "Controlling Boars", "Bombs", "Breakable Boxes", "Breakable Barriers", "Gathering Items",
    "Hidden Items", "Words", "Ordering Allies", "Ordering Animals", "Item and Equipment Shortcuts",
    "Wall Kicks", "Combo Basics", "Deflecting Enemy Magic", "Fighting Magic Resistant Enemies",
    "Fighting Wolves", "Stronger Dark Blasts", "Harvests", "Rare Items", "", "Collecting Materials",
    "Absorbing Blood", "Magical Collisions", "Ending B", "Ending C", "Ending D", "Evading",
    "Double Jump", "", "Weapon Quick Switching", "Finishing Blow",
    "Magic or Ability Quick Switching", "Lock On", "", "", "Poison",
];

pub const DOCUMENTS: &[&str] = &[
    "Look at the Sky", "Don't try so hard", "My Birthday!", "Love Letter 2/12/3340",
    "Love Letter 3/28/3340", "Love Letter 5/1/3340", "Letter from the Mayor",
    "The Postman's Request", "The Postman's Thanks", "Invitation from a Stranger",
    "Grand Re-Opening Notice", "Wedding Invitation", "Letter from the King",
    "Underground Research Record 1", "Underground Research Record 2",
    "Underground Research Record 3", "Underground Research Record 4", "Letter to the Chief",
    "Letter to two Brothers Weaponry", "Letter to Popola", "Letter to a Faraway Lover",
    "Letter from Emil", "Weapon Upgrade Notice", "Letter from the Chief of The Aerie",
];

pub const KEY_ITEMS: &[&str] = &[
    "Moon Key", "Star Key", "Light Key", "Darkness Key", "Fine Flour", "Coarse Flour",
    "Perfume Bottle", "Postman's Parcel", "Lover's Letter", "Water Filter", "Royal Compass",
    "Vapor Moss", "Valley Spider Silk", "Animal Guidebook", "Ore Guidebook", "Plant Guidebook",
    "Red Book", "Blue Book", "Old Lady's Elixir", "Old Lady's Elixir+", "Parcel for The Aerie",
    "Parcel for Seafront", "Cookbook", "Parcel for Facade", "Max's Herbs", "Drifting Cargo",
    "Drifting Cargo 2", "Drifting Cargo 3", "Drifting Cargo 4", "Old Package", "Mermaid Tear",
    "Mandrake Leaf", "Energizer", "Toad Oil", "Sleep-B-Gone", "Antidote", "Gold Bracelet",
    "Elite Kitchen Knife", "Elevator Parts", "Dirty Treasure Map", "Restored Treasure Map",
    "Jade Hair Ornament", "Employee List", "Small Safe", "Safe Key", "Great Tree Root",
    "Eye of Power", "Ribbon", "Yonah's Ribbon", "Bronze Key", "Brass Key", "Boar Tusk",
    "Pressed Freesia", "Potted Freesia", "Freesia (Delivery)", "Pile of Junk", "Old Gold Coin",
    "Marked Map", "AA Keycard", "KA Keycard", "SA Keycard", "TA Keycard", "NA Keycard",
    "HA Keycard", "MA Keycard", "YA Keycard", "RA Keycard", "WA Keycard", "Cultivator's Handbook",
    "Red Bag", "Lantern", "Empty Lantern", "Hold Key", "Passageway Key", "Goat Key", "Lizard Key",
    "Unlocking Procedure Memo", "Red Jewel?", "Red Flowers", "Apples",
];

/// Garden plot seed codes. Order differs from the inventory seed list.
pub const PLANTS: &[&str] = &[
    "Tomato Seed", "Eggplant Seed", "Bell Pepper Seed", "Bean Seed", "Pumpkin Seed",
    "Watermelon Seed", "Melon Seed", "Gourd Seed", "Wheat Seedling", "Rice Plant Seedling",
    "Dahlia Bulb", "Tulip Bulb", "Freesia Bulb", "Red Moonflower Seed", "Gold Moonflower Seed",
    "Peach Moonflower Seed", "Pink Moonflower Seed", "Blue Moonflower Seed",
    "Indigo Moonflower Seed", "White Moonflower Seed",
];

/// Garden plot fertilizer codes.
pub const FERTILIZER: &[&str] = &[
    "None", "Speed Fertilizer", "Flowering Fertilizer", "Bounty Fertilizer",
];

pub const FERTILIZERS: &[&str] = &[
    "Speed Fertilizer", "Flowering Fertilizer", "Bounty Fertilizer",
];

pub const SEEDS: &[&str] = &[
    "Pumpkin Seed", "Watermelon Seed", "Melon Seed", "Gourd Seed", "Tomato Seed", "Eggplant Seed",
    "Bell Pepper Seed", "Bean Seed", "Wheat Seedling", "Rice Plant Seedling", "Dahlia Bulb",
    "Tulip Bulb", "Freesia Bulb", "Red Moonflower Seed", "Gold Moonflower Seed",
    "Peach Moonflower Seed", "Pink Moonflower Seed", "Blue Moonflower Seed",
    "Indigo Moonflower Seed", "White Moonflower Seed",
];

pub const CULTIVATED: &[&str] = &[
    "Pumpkin", "Watermelon", "Melon", "Gourd", "Tomato", "Eggplant", "Bell Pepper", "Beans",
    "Wheat", "Rice", "Dahlia", "Tulip", "Freesia", "Red Moonflower", "Gold Moonflower",
    "Peach Moonflower", "Pink Moonflower", "Blue Moonflower", "Indigo Moonflower",
    "White Moonflower",
];

pub const RECOVERY_HEALTH: &[&str] = &[
    "Medicinal Herb", "Health Salve", "Recovery Potion",
];

pub const RECOVERY_STATS: &[&str] = &[
    "Strength Drop", "Strength Capsule", "Magic Drop", "Magic Capsule", "Defense Drop",
    "Defense Capsule", "Spirit Drop", "Spirit Capsule",
];

pub const RECOVERY_STATUS: &[&str] = &[
    "Antidotal Weed",
];

pub const RECOVERY_MISC: &[&str] = &[
    "Smelling Salts",
];

pub const RECOVERY: &[&[&str]] = &[RECOVERY_HEALTH, RECOVERY_STATS, RECOVERY_STATUS, RECOVERY_MISC];

pub const BAIT: &[&str] = &[
    "Lugworm", "Earthworm", "Lure",
];

pub const FISH: &[&str] = &[
    "Sardine", "Carp", "Blowfish", "Bream", "Shark", "Blue Marlin", "Dunkleosteus", "Rainbow Trout",
    "Black Bass", "Giant Catfish", "Royal Fish", "Hyneria", "Sandfish", "Rhizodont", "Shaman Fish",
];

pub const RAW_FISHED: &[&str] = &[
    "Aquatic Plant", "Deadwood", "Rusty Bucket", "Empty Can",
];

pub const RAW_MINERALS: &[&str] = &[
    "Gold Ore", "Silver Ore", "Copper Ore", "Iron Ore", "Crystal", "Pyrite", "Moldavite",
    "Meteorite", "Amber", "Fluorite", "Clay",
];

pub const RAW_PLANTS: &[&str] = &[
    "Berries", "Royal Fern", "Tree Branch", "Log", "Natural Rubber", "Ivy", "Lichen", "Mushroom",
    "Sap",
];

pub const RAW_SCAVENGED: &[&str] = &[
    "Mutton", "Boar Meat", "Wool", "Boar Hide", "Wolf Hide", "Wolf Fang", "Giant Spider Silk",
    "Bat Fang", "Bat Wing", "Goat Meat", "Goat Hide", "Venison", "Rainbow Spider Silk",
    "Boar Liver", "Scorpion Claw", "Scorpion Tail", "Dented Metal Board", "Stripped Bolt",
    "Broken Lens", "Severed Cable", "Broken Arm", "Broken Antenna", "Broken Motor",
    "Broken Battery", "Mysterious Switch", "Large Gear", "Titanium Alloy", "Memory Alloy",
    "Rusted Clump", "Machine Oil",
];

pub const RAW_SHADES: &[&str] = &[
    "Forlorn Necklace", "Twisted Ring", "Broken Earring", "Pretty Choker", "Metal Piercing",
    "Subdued Bracelet", "Technical Guide", "Grubby Book", "Thick Dictionary", "Closed Book",
    "Used Coloring Book", "Old Schoolbook", "Dirty Bag", "Flashy Hat", "Leather Gloves",
    "Silk Handkerchief", "Leather Boots", "Complex Machine", "Elaborate Machine", "Simple Machine",
    "Stopped Clock", "Broken Wristwatch", "Rusty Kitchen Knife", "Broken Saw", "Dented Metal Bat",
];

pub const RAW_SEAFRONT: &[&str] = &[
    "Shell", "Gastropod", "Bivalve", "Seaweed", "Empty Bottle", "Driftwood", "Pearl", "Black Pearl",
    "Crab", "Starfish",
];

pub const RAW_MISC: &[&str] = &[
    "Sea Turtle Egg", "Broken Pottery", "Desert Rose", "Giant Egg", "Damascus Steel", "Eagle Egg",
    "Chicken Egg",
];

pub const RAW_TAILS: &[&str] = &[
    "Mouse Tail", "Lizard Tail",
];

pub const RAW_ANTLERS: &[&str] = &[
    "Deer Antler",
];

pub const RAW_MATERIALS: &[&[&str]] = &[
    RAW_FISHED,
    RAW_MINERALS,
    RAW_PLANTS,
    RAW_SCAVENGED,
    RAW_SHADES,
    RAW_SEAFRONT,
    RAW_MISC,
    RAW_TAILS,
    RAW_ANTLERS,
];

pub const CHARACTERS: &[&str] = &[
    "NieR (Young)", "NieR (Prologue)", "NieR (Old)", "NieR (Gestalt)", "Kainé",
];

/// Cumulative experience needed to reach each level, indexed by level - 1.
pub const LEVEL_TO_EXP: &[u32] = &[
    0, 30, 240, 850, 2060, 4070, 7080, 11290, 16900, 24110,
    33120, 44130, 57340, 72950, 91160, 112170, 136180, 163390, 194000, 228210,
    266220, 308230, 354440, 405050, 460260, 520270, 585280, 655490, 731100, 812310,
    899320, 987380, 1076525, 1166790, 1258210, 1350820, 1444655, 1539750, 1636140, 1733860,
    1832945, 1933430, 2035350, 2138740, 2243635, 2350070, 2458080, 2567700, 2678965, 2791910,
    2906570, 3022980, 3141175, 3261190, 3383060, 3506820, 3632505, 3760150, 3889790, 4021460,
    4155195, 4289596, 4424674, 4560440, 4696906, 4834082, 4971979, 5110609, 5249983, 5390112,
    5531006, 5672677, 5815137, 5958395, 6102464, 6247355, 6393078, 6539644, 6687065, 6835352,
    6984516, 7134568, 7285518, 7437380, 7590162, 7743877, 7898535, 8054148, 8210726, 8368281,
    8526824, 8686367, 8846919, 9008492, 9171098, 9334747, 9499451, 9665220, 9832066,
];

/// Inclusive `(started bit, done bit)` ranges in the main quest block.
pub const QUEST_RANGES: &[(&str, usize, usize)] = &[
    ("Herbal Remedies", 28, 29),
    ("The Gatekeeper's Errand", 31, 33),
    ("The Lost Eggs", 35, 39),
    ("Old-Fashioned Home Cooking", 41, 43),
    ("Shopping List", 45, 47),
    ("Book Smarts", 49, 53),
    ("The Tavern Keeper's Grandmother", 55, 58),
    ("A Return to Shopping", 60, 62),
    ("Yonah's Cooking", 64, 65),
    ("Boar Hunt!", 67, 70),
    ("On the Wings of Eagles", 72, 76),
    ("Fragile Delivery", 78, 82),
    ("Fragile Delivery 2", 84, 88),
    ("The Fisherman's Gambit", 90, 91),
    ("The Fisherman's Gambit, Part 2", 93, 94),
    ("The Fisherman's Gambit, Part 3", 96, 97),
    ("The Fisherman's Gambit, Part 4", 99, 100),
    ("The Fisherman's Gambit, Part 5", 102, 103),
    ("The Ballad of the Twins", 105, 110),
    ("A Dog Astray", 112, 115),
    ("The New Merchant in Town", 117, 121),
    ("Yonah's Gift", 132, 139),
    ("Letter to a Lover", 141, 144),
    ("A Signature Dish", 146, 148),
    ("Bon Appetit!", 150, 154),
    ("Fragile Delivery 3", 156, 160),
    ("The Tangled Message", 162, 167),
    ("Item Unknown", 172, 174),
    ("The Runaway Son", 176, 186),
    ("Apology from a Fool", 188, 192),
    ("The Pride of a Lover", 198, 200),
    ("The Littlest Hero", 202, 205),
    ("The Missing Girl", 207, 211),
    ("A Shade Entombed", 214, 217),
    ("The Masterless Lighthouse", 219, 220),
    ("The Scattered Cargo", 222, 233),
    ("The Strange Fate of the Jewel", 236, 244),
    ("Thieves in Training (1)", 260, 269),
    ("Learning a Trade", 270, 278),
    ("A Bridge in Peril", 281, 284),
    ("Master of the Southern Plains", 286, 289),
    ("The Fisherman's Gambit, Part 6", 291, 292),
    ("The Fisherman's Gambit, Part 7", 294, 295),
    ("The Fisherman's Gambit, Part 8", 297, 298),
    ("The Fisherman's Final Gambit", 300, 301),
    ("Staying Afloat", 303, 305),
    ("Contract for a Contractor", 307, 309),
    ("The Creaky Waterwheel", 311, 315),
    ("The Faded Fountain", 317, 321),
    ("Bon Appetit! 2", 323, 325),
    ("Life in the Sands", 327, 329),
    ("The King's Mask", 331, 333),
    ("A Child's Final Chance", 334, 343),
    ("The Damaged Map", 345, 358),
    ("Research Project", 360, 365),
    ("A Tale of the Study", 367, 370),
    ("The Great Tree", 372, 375),
    ("The Despicable Man", 377, 383),
    ("A Memorable Knife", 385, 388),
    ("The Shade Army", 391, 397),
    ("A City Reborn", 399, 400),
    ("Nightmares and Dust", 402, 405),
    ("Disturbing the Sleep of Kings", 407, 410),
    ("Shadows of the Desert", 412, 416),
    ("Search for the Shade", 418, 427),
    ("Freesia", 429, 433),
    ("The Magical", 436, 441),
    ("The Postman's Request", 473, 474),
    ("The Lighthouse Lady's Wrath", 477, 487),
    ("Closure", 489, 490),
    ("Thieves in Training (2)", 504, 505),
];

pub const THIEVES_IN_TRAINING: &str = "Thieves in Training";
pub const THIEVES_IN_TRAINING_1: &str = "Thieves in Training (1)";
pub const THIEVES_IN_TRAINING_2: &str = "Thieves in Training (2)";

/// Ranges in the secondary 32-bit quest block.
pub const QUEST_B_RANGES: &[(&str, usize, usize)] = &[("The Promised Gift", 3, 9)];

/// Display name for a map identifier such as `B_SEASIDE_TOWN_011_D`.
pub fn map_zone(map: &str) -> Option<&'static str> {
    let parts: Vec<&str> = map.split('_').collect();
    let key = parts.get(1..3)?.join("_");
    MAP_ZONES
        .iter()
        .find(|(zone, _)| *zone == key)
        .map(|&(_, name)| name)
}

/// What a seed from the inventory grows into.
pub fn seed_result(seed: &str) -> Option<&'static str> {
    SEEDS
        .iter()
        .position(|&s| s == seed)
        .map(|i| CULTIVATED[i])
}

/// In-game level (1-based) reached with `xp` experience.
pub fn level_for_exp(xp: u32) -> usize {
    LEVEL_TO_EXP.iter().take_while(|&&needed| needed <= xp).count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn map_zone_uses_middle_of_identifier() {
        assert_eq!(map_zone("A_CENTER_VILLAGE_01"), Some("NieR's Village"));
        assert_eq!(map_zone("B_SEASIDE_TOWN_011_D"), Some("Seafront"));
        assert_eq!(map_zone("NO_IMAGE_AREA_00"), None);
        assert_eq!(map_zone("WORLD"), None);
    }

    #[test]
    fn quest_ranges_are_ordered_and_disjoint() {
        let mut last = None;
        for &(name, start, end) in QUEST_RANGES {
            assert!(end > start, "{name}");
            if let Some(prev) = last {
                assert!(start > prev, "{name} overlaps");
            }
            last = Some(end);
        }
        assert!(last.is_some_and(|end| end < 512));
    }

    #[test]
    fn table_sizes_match_block_widths() {
        assert_eq!(WORDS.len(), 128);
        assert_eq!(TUTORIALS.len(), 84);
        assert_eq!(KEY_ITEMS.len(), 80);
        assert_eq!(DOCUMENTS.len(), 24);
        assert_eq!(MAPS.len(), 24);
        assert_eq!(FISH.len(), 15);
        assert_eq!(SEEDS.len(), CULTIVATED.len());
    }

    #[test]
    fn levels_follow_experience_table() {
        assert_eq!(level_for_exp(0), 1);
        assert_eq!(level_for_exp(29), 1);
        assert_eq!(level_for_exp(30), 2);
        assert_eq!(level_for_exp(u32::MAX), LEVEL_TO_EXP.len());
        assert_eq!(seed_result("Tomato Seed"), Some("Tomato"));
    }
}
