//! Bottom-sheet snap positions and the layout they occlude.

use foundation::ScreenRect;

use crate::viewport::Occlusion;

/// Widths below this use the bottom sheet; wider screens use a side panel.
pub const NARROW_BREAKPOINT_PX: f64 = 768.0;
pub const SIDE_PANEL_WIDTH_PX: f64 = 420.0;
pub const PEEK_HEIGHT_PX: f64 = 100.0;

/// Sheet snap points, in the sheet component's index order.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum SheetSnap {
    /// 95% of the screen height.
    Expanded,
    /// 50% of the screen height.
    #[default]
    Half,
    /// Only the header strip is visible.
    Peek,
}

impl SheetSnap {
    pub fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(SheetSnap::Expanded),
            1 => Some(SheetSnap::Half),
            2 => Some(SheetSnap::Peek),
            _ => None,
        }
    }

    pub fn index(self) -> usize {
        match self {
            SheetSnap::Expanded => 0,
            SheetSnap::Half => 1,
            SheetSnap::Peek => 2,
        }
    }

    /// Screen pixels covered by the sheet at this snap point.
    pub fn covered_px(self, screen_height: f64) -> f64 {
        let h = screen_height.max(0.0);
        match self {
            SheetSnap::Expanded => h * 95.0 / 100.0,
            SheetSnap::Half => h / 2.0,
            SheetSnap::Peek => PEEK_HEIGHT_PX.min(h),
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum Layout {
    #[default]
    Narrow,
    Wide,
}

impl Layout {
    pub fn for_width(width_px: f64, breakpoint_px: f64) -> Self {
        if width_px < breakpoint_px {
            Layout::Narrow
        } else {
            Layout::Wide
        }
    }
}

/// Snap state of the list sheet and the details sheet.
///
/// The list snap is only recorded while the details sheet is closed: opening
/// the details collapses the list sheet, and that collapse must not overwrite
/// the position restored on dismissal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SheetState {
    list: SheetSnap,
    details: SheetSnap,
    details_open: bool,
}

impl SheetState {
    pub fn list(&self) -> SheetSnap {
        self.list
    }

    pub fn details(&self) -> SheetSnap {
        self.details
    }

    pub fn details_open(&self) -> bool {
        self.details_open
    }

    /// Returns `false` when the snap was ignored.
    pub fn on_list_snapped(&mut self, snap: SheetSnap) -> bool {
        if self.details_open {
            return false;
        }
        self.list = snap;
        true
    }

    pub fn on_details_snapped(&mut self, snap: SheetSnap) {
        if self.details_open {
            self.details = snap;
        }
    }

    pub fn open_details(&mut self) {
        self.details_open = true;
        self.details = SheetSnap::Half;
    }

    /// Closes the details sheet and returns the list snap to restore.
    pub fn close_details(&mut self) -> SheetSnap {
        self.details_open = false;
        self.list
    }

    /// Occlusion produced by whichever panel is showing.
    pub fn occlusion(&self, layout: Layout, screen: ScreenRect, side_panel_px: f64) -> Occlusion {
        match layout {
            Layout::Wide => Occlusion::left(side_panel_px.min(screen.width())),
            Layout::Narrow => {
                let snap = if self.details_open {
                    self.details
                } else {
                    self.list
                };
                Occlusion::bottom(snap.covered_px(screen.height()))
            }
        }
    }
}
