//! Day x time-slot grids for tabular timetable views.
//!
//! A grid borrows the sessions it was built from. Cells keep every session
//! that shares a day and slot, in encounter order, since batched labs put
//! several groups in the same room at the same time.

use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Serialize};

use crate::models::session::{Day, ScheduleType, Session, UNSCHEDULED};
use crate::time::compare_slots;

/// A grid column: a day of the week, or the catch-all for sessions whose
/// day is missing or unrecognised.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GridColumn {
    Day(Day),
    Unscheduled,
}

impl GridColumn {
    pub fn label(self) -> &'static str {
        match self {
            GridColumn::Day(day) => day.label(),
            GridColumn::Unscheduled => UNSCHEDULED,
        }
    }

    fn of(session: &Session) -> Self {
        session.day().map_or(GridColumn::Unscheduled, GridColumn::Day)
    }
}

#[derive(Debug, Clone)]
pub struct ScheduleGrid<'a> {
    columns: Vec<GridColumn>,
    cells: HashMap<GridColumn, HashMap<&'a str, Vec<&'a Session>>>,
    used_slots: Vec<&'a str>,
}

/// Buckets sessions by `(day, time_label)`.
///
/// Columns follow `day_order` and are present even when empty. Sessions
/// with an unknown day go to a trailing [`GridColumn::Unscheduled`] column,
/// added only when such sessions exist. Sessions on a known day that
/// `day_order` leaves out are skipped along with their slots.
pub fn build_grid<'a>(
    sessions: impl IntoIterator<Item = &'a Session>,
    day_order: &[Day],
) -> ScheduleGrid<'a> {
    let mut columns: Vec<GridColumn> = day_order.iter().copied().map(GridColumn::Day).collect();
    let mut cells: HashMap<GridColumn, HashMap<&'a str, Vec<&'a Session>>> = HashMap::new();
    let mut used_slots: Vec<&'a str> = Vec::new();

    for session in sessions {
        let column = GridColumn::of(session);
        if !columns.contains(&column) {
            if column != GridColumn::Unscheduled {
                continue;
            }
            columns.push(column);
        }

        let slot = session.time_label.as_str();
        if !used_slots.contains(&slot) {
            used_slots.push(slot);
        }
        cells
            .entry(column)
            .or_default()
            .entry(slot)
            .or_default()
            .push(session);
    }

    ScheduleGrid {
        columns,
        cells,
        used_slots,
    }
}

/// Canonical days that occur in `sessions`, in week order.
pub fn days_in<'a>(sessions: impl IntoIterator<Item = &'a Session>) -> Vec<Day> {
    let present: BTreeSet<Day> = sessions.into_iter().filter_map(Session::day).collect();
    present.into_iter().collect()
}

impl<'a> ScheduleGrid<'a> {
    pub fn columns(&self) -> &[GridColumn] {
        &self.columns
    }

    /// Sessions in one cell, in encounter order.
    pub fn cell(&self, column: GridColumn, slot: &str) -> &[&'a Session] {
        self.cells
            .get(&column)
            .and_then(|slots| slots.get(slot))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Distinct slots that hold at least one session, in encounter order.
    pub fn used_slots(&self) -> &[&'a str] {
        &self.used_slots
    }

    /// Used slots in chronological order. Unreadable labels go last, keeping
    /// their encounter order.
    pub fn sorted_slots(&self) -> Vec<&'a str> {
        let mut slots = self.used_slots.clone();
        slots.sort_by(|a, b| compare_slots(a, b));
        slots
    }

    /// Used slots split into a theory section and a lab section, each in
    /// chronological order. A slot hosting both kinds appears in both.
    pub fn slot_sections(&self) -> SlotSections<'a> {
        let mut sections = SlotSections::default();
        for slot in self.sorted_slots() {
            let hosts = |kind: ScheduleType| {
                self.columns.iter().any(|column| {
                    self.cell(*column, slot)
                        .iter()
                        .any(|session| session.schedule_type == kind)
                })
            };
            if hosts(ScheduleType::Theory) {
                sections.theory.push(slot);
            }
            if hosts(ScheduleType::Lab) {
                sections.lab.push(slot);
            }
        }
        sections
    }

    pub fn is_empty(&self) -> bool {
        self.used_slots.is_empty()
    }

    pub fn session_count(&self) -> usize {
        self.cells
            .values()
            .flat_map(HashMap::values)
            .map(Vec::len)
            .sum()
    }

    /// Owned, serializable rendering of the grid with slots in
    /// chronological order.
    pub fn to_table(&self) -> GridTable {
        GridTable {
            columns: self.headers(),
            rows: self.rows(&self.sorted_slots()),
        }
    }

    /// Like [`ScheduleGrid::to_table`] but with theory and lab slots in
    /// separate sections.
    pub fn to_sectioned_table(&self) -> SectionedGridTable {
        let sections = self.slot_sections();
        SectionedGridTable {
            columns: self.headers(),
            theory: self.rows(&sections.theory),
            lab: self.rows(&sections.lab),
        }
    }

    fn headers(&self) -> Vec<GridHeader> {
        self.columns
            .iter()
            .map(|column| GridHeader {
                column: *column,
                label: column.label().to_string(),
            })
            .collect()
    }

    fn rows(&self, slots: &[&str]) -> Vec<GridRow> {
        slots
            .iter()
            .map(|slot| GridRow {
                slot: slot.to_string(),
                cells: self
                    .columns
                    .iter()
                    .map(|column| {
                        self.cell(*column, slot)
                            .iter()
                            .map(|session| (*session).clone())
                            .collect()
                    })
                    .collect(),
            })
            .collect()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SlotSections<'a> {
    pub theory: Vec<&'a str>,
    pub lab: Vec<&'a str>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridHeader {
    pub column: GridColumn,
    pub label: String,
}

/// One slot of a rendered grid; `cells` is parallel to the table columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridRow {
    pub slot: String,
    pub cells: Vec<Vec<Session>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridTable {
    pub columns: Vec<GridHeader>,
    pub rows: Vec<GridRow>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionedGridTable {
    pub columns: Vec<GridHeader>,
    pub theory: Vec<GridRow>,
    pub lab: Vec<GridRow>,
}
