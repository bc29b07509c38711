//! Static wiring between plot elements and controller handlers.
//!
//! Plot elements that may issue seek requests are listed in a constant
//! table and resolved once when a controller is built. Events from
//! elements that are not in the resolved table are ignored.

use std::collections::HashMap;

use super::hosts::TelemetryPlotHost;

/// What the controller does with events from a plot element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlotHandler {
    /// Seek requests move the video.
    SeekVideo,
}

/// An event raised by a plot element.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PlotEvent {
    /// The user picked a session-relative time on the plot.
    SeekRequested(f64),
}

/// One entry of the binding table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlotBinding {
    pub element_id: &'static str,
    pub handler: PlotHandler,
}

/// Bindings for the session dashboard's travel and velocity plots.
pub const DEFAULT_PLOT_BINDINGS: &[PlotBinding] = &[
    PlotBinding {
        element_id: "travel",
        handler: PlotHandler::SeekVideo,
    },
    PlotBinding {
        element_id: "velocity",
        handler: PlotHandler::SeekVideo,
    },
];

/// Bindings resolved against a concrete plot host.
#[derive(Debug, Clone, Default)]
pub struct BindingTable {
    handlers: HashMap<&'static str, PlotHandler>,
}

impl BindingTable {
    /// Keep the bindings whose element the plot host actually exposes.
    pub fn resolve(bindings: &[PlotBinding], plot: &dyn TelemetryPlotHost) -> Self {
        let mut handlers = HashMap::with_capacity(bindings.len());
        for binding in bindings {
            if plot.has_element(binding.element_id) {
                handlers.insert(binding.element_id, binding.handler);
            } else {
                tracing::warn!("Plot has no element '{}', binding skipped", binding.element_id);
            }
        }
        Self { handlers }
    }

    /// Handler bound to an element, if any.
    pub fn handler_for(&self, element_id: &str) -> Option<PlotHandler> {
        self.handlers.get(element_id).copied()
    }

    /// Number of resolved bindings.
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    /// Whether no binding resolved.
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}
