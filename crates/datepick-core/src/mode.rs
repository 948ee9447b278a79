//! Picker kinds, panel modes and page navigation.

use crate::generate::GenerateConfig;

/// The kind of value a picker selects. This is the root of the panel
/// drill-down: the mode in which a selection commits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PickerKind {
    #[default]
    Date,
    Week,
    Month,
    Quarter,
    Year,
    Time,
}

impl PickerKind {
    /// The panel mode that commits for this picker. A date picker with a
    /// time part commits in [`PanelMode::DateTime`].
    pub fn internal_mode(self, show_time: bool) -> PanelMode {
        match self {
            PickerKind::Date if show_time => PanelMode::DateTime,
            PickerKind::Date => PanelMode::Date,
            PickerKind::Week => PanelMode::Week,
            PickerKind::Month => PanelMode::Month,
            PickerKind::Quarter => PanelMode::Quarter,
            PickerKind::Year => PanelMode::Year,
            PickerKind::Time => PanelMode::Time,
        }
    }

    /// Whether pickers of this kind may carry a time part.
    pub fn supports_time(self) -> bool {
        matches!(self, PickerKind::Date | PickerKind::Time)
    }
}

/// Granularity of the page currently on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PanelMode {
    Decade,
    Year,
    Quarter,
    Month,
    Week,
    Date,
    Time,
    DateTime,
}

const DATE_QUEUE: &[PanelMode] = &[
    PanelMode::Decade,
    PanelMode::Year,
    PanelMode::Month,
    PanelMode::Date,
];
const DATE_TIME_QUEUE: &[PanelMode] = &[
    PanelMode::Decade,
    PanelMode::Year,
    PanelMode::Month,
    PanelMode::DateTime,
];
const WEEK_QUEUE: &[PanelMode] = &[
    PanelMode::Decade,
    PanelMode::Year,
    PanelMode::Month,
    PanelMode::Week,
];
const QUARTER_QUEUE: &[PanelMode] = &[PanelMode::Decade, PanelMode::Year, PanelMode::Quarter];
const MONTH_QUEUE: &[PanelMode] = &[PanelMode::Decade, PanelMode::Year, PanelMode::Month];
const YEAR_QUEUE: &[PanelMode] = &[PanelMode::Decade, PanelMode::Year];
const TIME_QUEUE: &[PanelMode] = &[PanelMode::Time];

impl PanelMode {
    /// The drill-down path for a root mode, coarsest first.
    pub fn queue(root: PanelMode) -> &'static [PanelMode] {
        match root {
            PanelMode::Date => DATE_QUEUE,
            PanelMode::DateTime => DATE_TIME_QUEUE,
            PanelMode::Week => WEEK_QUEUE,
            PanelMode::Quarter => QUARTER_QUEUE,
            PanelMode::Month => MONTH_QUEUE,
            PanelMode::Year => YEAR_QUEUE,
            PanelMode::Decade => &YEAR_QUEUE[..1],
            PanelMode::Time => TIME_QUEUE,
        }
    }

    /// Mode to switch to after a cell is selected in `self`, or `None` when
    /// `self` is the terminal mode for `root` and the selection commits.
    pub fn next_on_select(self, root: PanelMode) -> Option<PanelMode> {
        if self == root {
            return None;
        }
        let queue = Self::queue(root);
        match queue.iter().position(|m| *m == self) {
            Some(pos) => queue.get(pos + 1).copied(),
            None => Some(root),
        }
    }

    /// One step coarser along `root`'s queue (the header "zoom out").
    pub fn coarser(self, root: PanelMode) -> Option<PanelMode> {
        let queue = Self::queue(root);
        let pos = queue.iter().position(|m| *m == self)?;
        pos.checked_sub(1).map(|p| queue[p])
    }

    /// Whether `self` is reachable from `root`.
    pub fn reachable_from(self, root: PanelMode) -> bool {
        Self::queue(root).contains(&self)
    }

    /// Whether the page shows a calendar grid (everything but time).
    pub fn has_cells(self) -> bool {
        self != PanelMode::Time
    }
}

/// Move `date` by `offset` pages of `mode`.
///
/// One page is a month for date, date-time and week panels, a year for
/// month and quarter panels, ten years for the year panel and a hundred
/// years for the decade panel. Time panels have no pages.
pub fn offset_panel_date<G: GenerateConfig>(
    gc: &G,
    mode: PanelMode,
    date: &G::Date,
    offset: i32,
) -> G::Date {
    match mode {
        PanelMode::Date | PanelMode::DateTime | PanelMode::Week => gc.add_month(date, offset),
        PanelMode::Month | PanelMode::Quarter => gc.add_year(date, offset),
        PanelMode::Year => gc.add_year(date, offset.saturating_mul(10)),
        PanelMode::Decade => gc.add_year(date, offset.saturating_mul(100)),
        PanelMode::Time => date.clone(),
    }
}

/// Move `date` by the header's "super" step: a year for day-based panels,
/// otherwise the same as [`offset_panel_date`].
pub fn super_offset_panel_date<G: GenerateConfig>(
    gc: &G,
    mode: PanelMode,
    date: &G::Date,
    offset: i32,
) -> G::Date {
    match mode {
        PanelMode::Date | PanelMode::DateTime | PanelMode::Week => gc.add_year(date, offset),
        _ => offset_panel_date(gc, mode, date, offset),
    }
}

/// Keyboard direction for moving the cell cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

/// Move a cell cursor one step in `direction` on a `mode` grid.
pub fn move_cell<G: GenerateConfig>(
    gc: &G,
    mode: PanelMode,
    date: &G::Date,
    direction: Direction,
) -> G::Date {
    let (horizontal, vertical) = match direction {
        Direction::Left => (-1, 0),
        Direction::Right => (1, 0),
        Direction::Up => (0, -1),
        Direction::Down => (0, 1),
    };
    match mode {
        PanelMode::Date | PanelMode::DateTime => gc.add_date(date, horizontal + vertical * 7),
        PanelMode::Week => gc.add_date(date, (horizontal + vertical) * 7),
        PanelMode::Month => gc.add_month(date, horizontal + vertical * 3),
        PanelMode::Quarter => gc.add_month(date, horizontal * 3 + vertical * 12),
        PanelMode::Year => gc.add_year(date, horizontal + vertical * 3),
        PanelMode::Decade => gc.add_year(date, (horizontal + vertical * 3) * 10),
        PanelMode::Time => date.clone(),
    }
}
