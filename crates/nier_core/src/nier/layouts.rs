//! Static layouts of the NieR Replicant ver.1.22 save format.
//!
//! Offsets follow from field order. Sizes are asserted when each layout is
//! first built, so a miscounted block fails loudly on first use.

use std::borrow::Cow;
use std::sync::LazyLock;

use crate::codec::Codec;
use crate::codec::checksum::ChecksumSpec;
use crate::codec::enums::EnumTable;
use crate::codec::flags::FlagArray;
use crate::codec::primitive::Primitive;
use crate::codec::quests::{QuestBitfield, QuestMerge};
use crate::record::Layout;
use crate::tables::*;

pub const SLOT_SIZE: usize = 37_472;
pub const HEADER_SIZE: usize = 33_120;
pub const PLOT_SIZE: usize = 24;
pub const GARDEN_ROWS: usize = 3;
pub const GARDEN_COLUMNS: usize = 5;

/// Value of `corruptness` in a healthy slot.
pub const SLOT_OK_MARKER: u64 = 200;

pub const SLOT_CHECKSUM: ChecksumSpec = ChecksumSpec::new(37_456, 3_104);
pub const HEADER_CHECKSUM: ChecksumSpec = ChecksumSpec::new(33_108, 424);

const EMPTY_SEED: i64 = 255;
const NO_WORD: i64 = 255;
const NO_WEAPON: i64 = u32::MAX as i64;

const LEADING_GAP: &[&str] = &[];

// region enums

pub static CHARACTER: LazyLock<EnumTable> =
    LazyLock::new(|| EnumTable::indexed("character", Primitive::U32, CHARACTERS));

pub static ABILITY: LazyLock<EnumTable> =
    LazyLock::new(|| EnumTable::indexed("ability", Primitive::U32, ABILITIES));

pub static WEAPON: LazyLock<EnumTable> = LazyLock::new(|| {
    EnumTable::segmented(
        "weapon",
        Primitive::U32,
        &[(0, SWORDS_1H), (20, SWORDS_2H), (40, SPEARS)],
    )
    .with_sentinel(NO_WEAPON)
});

pub static WEAPON_STATE: LazyLock<EnumTable> = LazyLock::new(|| {
    EnumTable::explicit(
        "weapon state",
        Primitive::U8,
        [
            (0, "Level 1"),
            (1, "Level 2"),
            (2, "Level 3"),
            (3, "Level 4"),
            (255, "Not Owned"),
        ],
    )
});

pub static WORD_EQUIPPED: LazyLock<EnumTable> =
    LazyLock::new(|| EnumTable::indexed("word", Primitive::U8, WORDS).with_sentinel(NO_WORD));

pub static FISH_RECORD_STATE: LazyLock<EnumTable> = LazyLock::new(|| {
    EnumTable::explicit("fish record state", Primitive::U8, [(0, "viewed"), (1, "new")])
});

pub static SEED: LazyLock<EnumTable> = LazyLock::new(|| {
    EnumTable::indexed("seed", Primitive::U32, PLANTS).with_sentinel(EMPTY_SEED)
});

pub static FERTILIZER_KIND: LazyLock<EnumTable> =
    LazyLock::new(|| EnumTable::indexed("fertilizer", Primitive::U32, FERTILIZER));

pub static DIRECTION: LazyLock<EnumTable> = LazyLock::new(|| {
    EnumTable::float(
        "direction",
        &[(0.0, "East"), (90.0, "North"), (180.0, "West"), (270.0, "South")],
    )
});

// endregion

// region bit flags

pub static ENDINGS: LazyLock<FlagArray> =
    LazyLock::new(|| FlagArray::from_names(&["A", "B", "C", "D", "E"], Some(4)));

pub static WATER: LazyLock<FlagArray> =
    LazyLock::new(|| FlagArray::from_names(&["first", "second"], Some(4)));

pub static WORDS_LEARNED: LazyLock<FlagArray> =
    LazyLock::new(|| FlagArray::from_names(WORDS, Some(16)));

pub static TUTORIALS_UNLOCKED: LazyLock<FlagArray> =
    LazyLock::new(|| FlagArray::from_names(TUTORIALS, Some(12)));

pub static KEY_ITEM_VIEWED: LazyLock<FlagArray> = LazyLock::new(|| {
    FlagArray::from_names(KEY_ITEMS, Some(10)).with_labels("new", "viewed")
});

pub static RECOVERY_VIEWED: LazyLock<FlagArray> = LazyLock::new(|| {
    FlagArray::from_groups(RECOVERY, &[18, 2, 1, 6]).with_labels("new", "viewed")
});

pub static CULTIVATION_VIEWED: LazyLock<FlagArray> = LazyLock::new(|| {
    FlagArray::from_groups(&[LEADING_GAP, FERTILIZERS, SEEDS, CULTIVATED], &[1, 2, 5, 5])
        .with_labels("new", "viewed")
});

pub static FISHING_VIEWED: LazyLock<FlagArray> = LazyLock::new(|| {
    FlagArray::from_groups(&[LEADING_GAP, BAIT, FISH], &[5, 7, 2]).with_labels("new", "viewed")
});

pub static RAW_MATERIALS_VIEWED: LazyLock<FlagArray> = LazyLock::new(|| {
    let mut groups = vec![LEADING_GAP];
    groups.extend_from_slice(RAW_MATERIALS);
    FlagArray::from_groups(&groups, &[3, 3, 4, 5, 4, 1, 5, 1, 3, 0]).with_labels("new", "viewed")
});

// endregion

// region quests

pub static QUESTS: LazyLock<QuestBitfield> = LazyLock::new(|| {
    QuestBitfield::new(512, QUEST_RANGES).with_merge(QuestMerge {
        name: THIEVES_IN_TRAINING,
        first: THIEVES_IN_TRAINING_1,
        second: THIEVES_IN_TRAINING_2,
    })
});

pub static QUESTS_B: LazyLock<QuestBitfield> =
    LazyLock::new(|| QuestBitfield::new(32, QUEST_B_RANGES));

// endregion

/// One field per name, each section followed by `pads[i]` filler bytes named
/// `_unk{i}` when the pad is non-zero.
fn struct_parts(
    sections: &[&[&'static str]],
    pads: &[usize],
    codec: impl Fn() -> Codec,
) -> Vec<(Cow<'static, str>, Codec)> {
    let mut fields = Vec::new();
    for (i, (section, &pad)) in sections.iter().zip(pads).enumerate() {
        fields.extend(section.iter().map(|&name| (Cow::Borrowed(name), codec())));
        if pad > 0 {
            fields.push((Cow::Owned(format!("_unk{i}")), Codec::Bytes(pad)));
        }
    }
    fields
}

fn counts(names: &[&'static str]) -> Vec<(Cow<'static, str>, Codec)> {
    struct_parts(&[names], &[0], || Codec::Prim(Primitive::U8))
}

// region inventory

pub static RECOVERY_ITEMS: LazyLock<Layout> = LazyLock::new(|| {
    Layout::builder("recovery")
        .fields(struct_parts(RECOVERY, &[18, 2, 1, 0], || {
            Codec::Prim(Primitive::U8)
        }))
        .build_sized(34)
});

pub static CULTIVATION_ITEMS: LazyLock<Layout> = LazyLock::new(|| {
    Layout::builder("cultivation")
        .fields(struct_parts(&[FERTILIZERS, SEEDS, CULTIVATED], &[2, 5, 0], || {
            Codec::Prim(Primitive::U8)
        }))
        .build_sized(50)
});

pub static FISHING_ITEMS: LazyLock<Layout> = LazyLock::new(|| {
    Layout::builder("fishing")
        .fields(struct_parts(&[BAIT, FISH], &[7, 0], || Codec::Prim(Primitive::U8)))
        .build_sized(25)
});

pub static RAW_MATERIAL_ITEMS: LazyLock<Layout> = LazyLock::new(|| {
    Layout::builder("raw materials")
        .fields(struct_parts(
            RAW_MATERIALS,
            &[3, 4, 5, 4, 1, 5, 1, 3, 0],
            || Codec::Prim(Primitive::U8),
        ))
        .build_sized(125)
});

pub static KEY_ITEM_COUNTS: LazyLock<Layout> =
    LazyLock::new(|| Layout::builder("key items").fields(counts(KEY_ITEMS)).build_sized(80));

pub static DOCUMENT_COUNTS: LazyLock<Layout> =
    LazyLock::new(|| Layout::builder("documents").fields(counts(DOCUMENTS)).build_sized(24));

pub static MAP_COUNTS: LazyLock<Layout> =
    LazyLock::new(|| Layout::builder("maps").fields(counts(MAPS)).build_sized(24));

// endregion

// region weapons and words

pub static WEAPON_LEVELS: LazyLock<Layout> = LazyLock::new(|| {
    Layout::builder("weapons")
        .fields(struct_parts(&[SWORDS_1H, SWORDS_2H, SPEARS], &[3, 10, 0], || {
            Codec::Enum(&WEAPON_STATE)
        }))
        .build_sized(51)
});

pub static WEAPON_WORDS: LazyLock<Layout> = LazyLock::new(|| {
    Layout::builder("weapon words")
        .fields(struct_parts(&[SWORDS_1H, SWORDS_2H, SPEARS], &[3, 10, 0], || {
            Codec::Enum(&WORD_EQUIPPED)
        }))
        .build_sized(51)
});

pub static ABILITY_WORDS: LazyLock<Layout> = LazyLock::new(|| {
    Layout::builder("ability words")
        .fields(struct_parts(&[&ABILITIES[1..]], &[0], || {
            Codec::Enum(&WORD_EQUIPPED)
        }))
        .build_sized(10)
});

// endregion

// region fishing records

pub static FISH_RECORD_STATES: LazyLock<Layout> = LazyLock::new(|| {
    Layout::builder("fishing record states")
        .fields(struct_parts(&[FISH], &[0], || Codec::Enum(&FISH_RECORD_STATE)))
        .build_sized(15)
});

/// Centimetres.
pub static FISH_RECORD_SIZES: LazyLock<Layout> = LazyLock::new(|| {
    Layout::builder("fishing record sizes")
        .fields(struct_parts(&[FISH], &[0], || Codec::Prim(Primitive::F64)))
        .build_sized(120)
});

/// Grams.
pub static FISH_RECORD_WEIGHTS: LazyLock<Layout> = LazyLock::new(|| {
    Layout::builder("fishing record weights")
        .fields(struct_parts(&[FISH], &[0], || Codec::Prim(Primitive::F64)))
        .build_sized(120)
});

// endregion

pub static PLOT: LazyLock<Layout> = LazyLock::new(|| {
    Layout::builder("plot")
        .field("seed", Codec::Enum(&SEED))
        .field("fertilizer", Codec::Enum(&FERTILIZER_KIND))
        .field("water", Codec::Flags(&WATER))
        .field("direction", Codec::Enum(&DIRECTION))
        .field("time", Codec::DateTime)
        .bytes("_pad", 1)
        .build_sized(PLOT_SIZE)
});

fn garden() -> Codec {
    Codec::array(
        Codec::array(Codec::raw_copy(Codec::Record(&PLOT)), GARDEN_COLUMNS),
        GARDEN_ROWS,
    )
}

pub static SLOT: LazyLock<Layout> = LazyLock::new(|| {
    let weapon = || Codec::Enum(&WEAPON);
    let ability = || Codec::Enum(&ABILITY);
    let int = || Codec::Prim(Primitive::I32);
    let float = || Codec::Prim(Primitive::F32);

    Layout::builder("save slot")
        // character
        .field("corruptness", Codec::Prim(Primitive::U32))
        .field("map", Codec::Str(32))
        .field("spawn", Codec::Prim(Primitive::U32))
        .field("character", Codec::Enum(&CHARACTER))
        .field("name", Codec::Str(32))
        .field("health", int())
        .field("health_kaine", int())
        .field("health_emil", int())
        .field("magic", float())
        .field("magic_kaine", float())
        .field("magic_emil", float())
        .field("level", int())
        .field("level_kaine", int())
        .field("level_emil", int())
        .field("xp", int())
        .bytes("_unk4", 12)
        .field("order_kaine", Codec::Prim(Primitive::U32))
        .field("order_emil", Codec::Prim(Primitive::U32))
        .field("active_weapon", weapon())
        .field("selected_sword_1h", weapon())
        .field("selected_sword_2h", weapon())
        .field("selected_spear", weapon())
        .bytes("_unk5", 8)
        .field("left_bumper", ability())
        .field("right_bumper", ability())
        .field("left_trigger", ability())
        .field("right_trigger", ability())
        .bytes("_unk6", 12)
        .field("money", int())
        // inventory
        .field("recovery", Codec::Record(&RECOVERY_ITEMS))
        .bytes("_unk7", 7)
        .field("cultivation", Codec::Record(&CULTIVATION_ITEMS))
        .bytes("_unk8", 10)
        .field("fishing", Codec::Record(&FISHING_ITEMS))
        .bytes("_unk9", 5)
        .field("raw_materials", Codec::Record(&RAW_MATERIAL_ITEMS))
        .field("key_items", Codec::Record(&KEY_ITEM_COUNTS))
        .bytes("_unk10", 176)
        .field("documents", Codec::Record(&DOCUMENT_COUNTS))
        .bytes("_unk11", 168)
        .field("maps", Codec::Record(&MAP_COUNTS))
        .bytes("_unk12a1", 40)
        .bytes("_unk12a2", 32)
        .bytes("_unk12a3", 32)
        .bytes("_unk12a4", 32)
        // new / viewed markers
        .field("recovery_viewed_states", Codec::Flags(&RECOVERY_VIEWED))
        .field("cultivation_viewed_states", Codec::Flags(&CULTIVATION_VIEWED))
        .field("fishing_viewed_states", Codec::Flags(&FISHING_VIEWED))
        .field("raw_materials_viewed_states", Codec::Flags(&RAW_MATERIALS_VIEWED))
        .field("key_item_viewed_states", Codec::Flags(&KEY_ITEM_VIEWED))
        .bytes("_unk12b", 86)
        .field("total_play_time", Codec::Prim(Primitive::F64))
        .bytes("_unk13", 4)
        .field("weapons", Codec::Record(&WEAPON_LEVELS))
        .bytes("_unk14a", 1)
        .bytes("_maybe_weapon_viewed_states", 32)
        .bytes("_unk14b", 23)
        .bytes("_unk14c", 137)
        .bytes("_unk14d", 32)
        // quests
        .field("quests", Codec::Quests(&QUESTS))
        .bytes("_unk15a1a1", 100)
        .bytes("_unk15a1a2", 100)
        .field("sheep_kill_count", Codec::Prim(Primitive::U8))
        .bytes("_unk15a1b", 55)
        .field("_maybe_mission_objective", Codec::Prim(Primitive::U32))
        .bytes("_unk15a2b", 20)
        .bytes("quest_viewed_states", 11)
        .bytes("_unk15b", 21)
        // words
        .field("words", Codec::Flags(&WORDS_LEARNED))
        .bytes("_unk16a", 16)
        .field("ability_words_a", Codec::Record(&ABILITY_WORDS))
        .field("weapon_words_a", Codec::Record(&WEAPON_WORDS))
        .bytes("_unk16b", 13)
        .field("ability_words_b", Codec::Record(&ABILITY_WORDS))
        .field("weapon_words_b", Codec::Record(&WEAPON_WORDS))
        .bytes("_unk16c", 17)
        .field("tutorials", Codec::Flags(&TUTORIALS_UNLOCKED))
        .bytes("_unk17a1a", 4)
        .bytes("_maybe_tutorial_viewed_states", 16)
        .bytes("_unk17a1b", 48)
        // fishing records and garden
        .field("fishing_record_sizes", Codec::Record(&FISH_RECORD_SIZES))
        .bytes("_unk17a2", 72)
        .field("fishing_record_weights", Codec::Record(&FISH_RECORD_WEIGHTS))
        .bytes("_unk17a3", 32)
        .field("garden", garden())
        .bytes("_unk17b1a", 168)
        .bytes("_unk17b1b", 21)
        .field("fishing_record_states", Codec::Record(&FISH_RECORD_STATES))
        .bytes("_unk17b2a", 99)
        .bytes("_unk17b2b", 29)
        .field("quests_b", Codec::Quests(&QUESTS_B))
        .bytes("_unk18a1a", 96)
        .bytes("_unk18a1b", 136)
        .bytes("_unk18a1c", 8)
        .bytes("_unk18a2", 240)
        .bytes("_unk18a3", 40)
        .bytes("_unk18a4a", 68)
        .bytes("_unk18a4b", 4)
        .bytes("_unk18a4c", 616)
        .bytes("_unk18a4d", 32)
        .bytes("_unk18a5", 86)
        .field("save_time", Codec::DateTime)
        .field("_unk18b0", Codec::Prim(Primitive::U8))
        .bytes("_unk18b1", 199)
        .bytes("_unk18b2", 32_771)
        .field("checksum", Codec::Checksum(SLOT_CHECKSUM))
        .bytes("_end", 12)
        .build_sized(SLOT_SIZE)
});

pub static HEADER: LazyLock<Layout> = LazyLock::new(|| {
    Layout::builder("header")
        .bytes("_unk1", 4)
        .field("endings", Codec::Flags(&ENDINGS))
        .field("d_name", Codec::Str(32))
        .bytes("_unk3", 16)
        .bytes("_unk4", 24)
        .bytes("_unk5a", 28)
        .bytes("_unk5b", 24)
        .bytes("_unk5c", 28)
        .bytes("_unk5d", 84)
        .bytes("_unk5e", 48)
        .bytes("_unk5f", 128)
        .bytes("_unk5g", 4)
        .bytes("_unk6", 32_684)
        .field("checksum", Codec::Checksum(HEADER_CHECKSUM))
        .bytes("_end", 8)
        .build_sized(HEADER_SIZE)
});
