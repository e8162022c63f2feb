// src/types.rs
use crate::signal::Span;

// 两个通道的绘图区
#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug)]
pub enum PlotId {
    Electrode1,
    Electrode2,
}

impl PlotId {
    pub const ALL: [PlotId; 2] = [PlotId::Electrode1, PlotId::Electrode2];

    pub fn channel_index(&self) -> usize {
        match self {
            PlotId::Electrode1 => 0,
            PlotId::Electrode2 => 1,
        }
    }
}

// 界面动作：先收集，帧末统一处理
#[derive(Clone, Debug, PartialEq)]
pub enum ViewerAction {
    BrowseFolder,
    SelectFile(usize),
    ToggleSpan(bool),
    CopySpanTimes,
    CopyMedianDiff,
    ExportPng,
}

// 拖动的是哪一部分
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub enum SpanHandle {
    Start,
    End,
    Body,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpanDrag {
    pub origin: PlotId,
    pub handle: SpanHandle,
    /// Pointer x minus span start when the body was grabbed.
    grab_offset: f64,
}

/// The one span shared by every plot.
///
/// Plots never talk to each other: each reads `span()` every frame and writes
/// through the drag methods. A drag belongs to the plot that started it, and
/// pointer updates from any other plot are dropped, so no update can bounce back.
#[derive(Clone, Debug, Default)]
pub struct SpanSelection {
    span: Option<Span>,
    drag: Option<SpanDrag>,
    revision: u64,
}

impl SpanSelection {
    pub fn span(&self) -> Option<Span> {
        self.span
    }

    pub fn is_active(&self) -> bool {
        self.span.is_some()
    }

    pub fn drag(&self) -> Option<SpanDrag> {
        self.drag
    }

    /// Bumped on every change of the span value.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn show(&mut self, center: f64, width: f64) {
        self.set(Some(Span::centered(center, width)));
    }

    pub fn hide(&mut self) {
        self.drag = None;
        self.set(None);
    }

    /// Starts a drag if `x` hits an edge (within `tolerance`) or the inside of the span.
    pub fn begin_drag(&mut self, origin: PlotId, x: f64, tolerance: f64) -> bool {
        let Some(span) = self.span else {
            return false;
        };
        if self.drag.is_some() {
            return false;
        }
        let to_start = (x - span.start()).abs();
        let to_end = (x - span.end()).abs();
        let handle = if to_start <= tolerance && to_start <= to_end {
            SpanHandle::Start
        } else if to_end <= tolerance {
            SpanHandle::End
        } else if span.contains(x) {
            SpanHandle::Body
        } else {
            return false;
        };
        self.drag = Some(SpanDrag {
            origin,
            handle,
            grab_offset: x - span.start(),
        });
        true
    }

    /// Moves the dragged part to `x`. Returns whether the span changed.
    pub fn drag_to(&mut self, origin: PlotId, x: f64) -> bool {
        let (Some(span), Some(drag)) = (self.span, self.drag) else {
            return false;
        };
        if drag.origin != origin {
            return false;
        }
        let moved = match drag.handle {
            SpanHandle::Start => Span::new(x, span.end()),
            SpanHandle::End => Span::new(span.start(), x),
            SpanHandle::Body => span.shifted(x - drag.grab_offset - span.start()),
        };
        if moved == span {
            return false;
        }
        // Dragging an edge across the other one swaps which edge is held.
        let handle = match drag.handle {
            SpanHandle::Start if x > span.end() => SpanHandle::End,
            SpanHandle::End if x < span.start() => SpanHandle::Start,
            other => other,
        };
        self.drag = Some(SpanDrag { handle, ..drag });
        self.set(Some(moved));
        true
    }

    pub fn end_drag(&mut self, origin: PlotId) {
        if self.drag.map(|d| d.origin) == Some(origin) {
            self.drag = None;
        }
    }

    fn set(&mut self, span: Option<Span>) {
        if self.span != span {
            self.span = span;
            self.revision += 1;
        }
    }
}
