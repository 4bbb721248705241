//! The 3 x 5 garden grid. Plots are raw-copy records, so editing one plot
//! leaves every other plot's bytes exactly as they were read.

use std::fmt;

use chrono::{NaiveDateTime, TimeDelta, Timelike};
use tracing::debug;

use crate::codec::datetime::Timestamp;
use crate::error::{CodecError, Result};
use crate::nier::layouts::GARDEN_COLUMNS;
use crate::nier::slot::SaveSlot;
use crate::record::Record;
use crate::tables::seed_result;
use crate::value::Value;

/// When seeds were planted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlantTime {
    At(NaiveDateTime),
    HoursBefore { hours: i64, now: NaiveDateTime },
}

impl PlantTime {
    fn resolve(self) -> Result<NaiveDateTime> {
        match self {
            Self::At(dt) => Ok(dt),
            Self::HoursBefore { hours, now } => TimeDelta::try_hours(hours)
                .and_then(|delta| now.checked_sub_signed(delta))
                .and_then(|dt| dt.with_nanosecond(0))
                .ok_or_else(|| {
                    CodecError::invalid_mutation("garden", format!("{hours} hours is out of range"))
                }),
        }
    }
}

/// Which plots an edit touches. Plots are numbered 0..15 row by row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlotFilter {
    pub plots: Option<Vec<usize>>,
    pub only_planted: bool,
    pub only_unfertilized: bool,
}

impl PlotFilter {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn planted() -> Self {
        Self {
            only_planted: true,
            ..Self::default()
        }
    }

    pub fn with_plots(mut self, plots: impl IntoIterator<Item = usize>) -> Self {
        self.plots = Some(plots.into_iter().collect());
        self
    }

    fn accepts(&self, index: usize, plot: &GardenPlot) -> bool {
        if self.only_planted && !plot.is_planted() {
            return false;
        }
        if self.only_unfertilized && plot.fertilizer != "None" {
            return false;
        }
        self.plots.as_ref().is_none_or(|p| p.contains(&index))
    }
}

/// Read-only snapshot of one plot.
#[derive(Debug, Clone, PartialEq)]
pub struct GardenPlot {
    pub row: usize,
    pub column: usize,
    pub seed: Option<&'static str>,
    pub fertilizer: &'static str,
    pub water: [bool; 2],
    pub direction: &'static str,
    pub time: Timestamp,
}

impl GardenPlot {
    fn from_record(row: usize, column: usize, plot: &Record) -> Self {
        let name = |field: &str| {
            plot.get(field)
                .and_then(Value::as_enum)
                .and_then(|e| e.name())
        };
        let water = plot.get("water").and_then(Value::as_flags);
        let watered = |which| water.and_then(|w| w.get(which)).unwrap_or(false);
        Self {
            row,
            column,
            seed: name("seed"),
            fertilizer: name("fertilizer").unwrap_or("None"),
            water: [watered("first"), watered("second")],
            direction: name("direction").unwrap_or("East"),
            time: plot
                .get("time")
                .and_then(Value::as_timestamp)
                .copied()
                .unwrap_or(Timestamp::Unset),
        }
    }

    pub fn index(&self) -> usize {
        self.row * GARDEN_COLUMNS + self.column
    }

    pub fn is_planted(&self) -> bool {
        self.seed.is_some()
    }

    /// What the plot will grow into, e.g. `Tomato` for a `Tomato Seed`.
    pub fn crop(&self) -> Option<&'static str> {
        self.seed.map(|seed| seed_result(seed).unwrap_or(seed))
    }
}

impl fmt::Display for GardenPlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let water: String = self
            .water
            .iter()
            .map(|&w| if w { '\u{25cb}' } else { '\u{2715}' })
            .collect();
        let fertilizer = self.fertilizer.split(' ').next().unwrap_or(self.fertilizer);
        write!(
            f,
            "\u{2039}{} | F:{fertilizer} | W:{water} | {} | {:>5}\u{203a}",
            self.crop().unwrap_or("None"),
            self.time,
            self.direction
        )
    }
}

impl SaveSlot {
    /// All fifteen plots in row order.
    pub fn garden(&self) -> Vec<GardenPlot> {
        let mut plots = Vec::new();
        let rows = self.get("garden").and_then(Value::as_list).unwrap_or_default();
        for (r, row) in rows.iter().enumerate() {
            for (c, plot) in row.as_list().unwrap_or_default().iter().enumerate() {
                if let Some(record) = plot.as_record() {
                    plots.push(GardenPlot::from_record(r, c, record));
                }
            }
        }
        plots
    }

    /// Set the planting time of planted plots. Empty plots are never touched.
    pub fn set_plant_times(&mut self, when: PlantTime, filter: &PlotFilter) -> Result<usize> {
        let time = Value::DateTime(Timestamp::At(when.resolve()?));
        let filter = PlotFilter {
            only_planted: true,
            ..filter.clone()
        };
        self.edit_plots(&filter, |plot| plot.set("time", time.clone()))
    }

    /// Set the fertilizer by name (`"None"` clears it).
    pub fn set_fertilizer(&mut self, fertilizer: &str, filter: &PlotFilter) -> Result<usize> {
        let value = Value::Str(fertilizer.to_string());
        self.edit_plots(filter, |plot| plot.set("fertilizer", value.clone()))
    }

    /// Water planted plots once (`1`) or twice (`2`); `0` dries them.
    pub fn set_water(&mut self, times: u8, filter: &PlotFilter) -> Result<usize> {
        if times > 2 {
            return Err(CodecError::invalid_mutation(
                "garden",
                format!("plots can be watered at most twice, not {times}"),
            ));
        }
        let filter = PlotFilter {
            only_planted: true,
            ..filter.clone()
        };
        self.edit_plots(&filter, |plot| {
            plot.update("water", |water| {
                let flags = water
                    .as_flags_mut()
                    .ok_or_else(|| CodecError::invalid_mutation("water", "not a flag set"))?;
                flags.set("first", times >= 1)?;
                flags.set("second", times >= 2)
            })
        })
    }

    /// Apply `edit` to every plot `filter` accepts, atomically across the
    /// whole grid. Returns how many plots were edited.
    fn edit_plots<F>(&mut self, filter: &PlotFilter, mut edit: F) -> Result<usize>
    where
        F: FnMut(&mut Record) -> Result<()>,
    {
        let mut edited = 0usize;
        self.record_mut().update("garden", |garden| {
            let rows = garden
                .as_list_mut()
                .ok_or_else(|| CodecError::invalid_mutation("garden", "not a grid"))?;
            for (r, row) in rows.iter_mut().enumerate() {
                let plots = row
                    .as_list_mut()
                    .ok_or_else(|| CodecError::invalid_mutation(r.to_string(), "not a row"))?;
                for (c, plot) in plots.iter_mut().enumerate() {
                    let Some(current) = plot.as_record() else {
                        continue;
                    };
                    let view = GardenPlot::from_record(r, c, current);
                    if !filter.accepts(view.index(), &view) {
                        continue;
                    }
                    let record = plot.as_record_mut().ok_or_else(|| {
                        CodecError::invalid_mutation(format!("{r}.{c}"), "not a plot")
                    })?;
                    edit(record).map_err(|e| e.at(&format!("{r}.{c}"), 0))?;
                    edited += 1;
                }
            }
            Ok(())
        })?;
        debug!(edited, "garden plots updated");
        Ok(edited)
    }
}
