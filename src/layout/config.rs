//! Configuration for the layered layout

/// Configuration options for layout computation
#[derive(Debug, Clone)]
pub struct LayoutConfig {
    /// Horizontal gap between layers
    pub horizontal_gap: f64,

    /// Vertical gap between nodes within a layer
    pub vertical_gap: f64,

    /// Default size for block cards (width, height)
    pub block_size: (f64, f64),

    /// Height of a label node in the route graph
    pub label_node_height: f64,

    /// Estimated width per character of a label name
    pub label_char_width: f64,

    /// Minimum width of a label node
    pub label_min_width: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            horizontal_gap: 60.0,
            vertical_gap: 24.0,
            block_size: (180.0, 110.0),
            label_node_height: 28.0,
            label_char_width: 7.0,
            label_min_width: 64.0,
        }
    }
}

impl LayoutConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the gap between layers
    pub fn with_horizontal_gap(mut self, gap: f64) -> Self {
        self.horizontal_gap = gap;
        self
    }

    /// Set the gap between nodes within a layer
    pub fn with_vertical_gap(mut self, gap: f64) -> Self {
        self.vertical_gap = gap;
        self
    }

    /// Set the default block card size
    pub fn with_block_size(mut self, width: f64, height: f64) -> Self {
        self.block_size = (width, height);
        self
    }

    /// Width of a label node, estimated from its text.
    pub fn label_node_width(&self, label: &str) -> f64 {
        (label.len() as f64 * self.label_char_width + 16.0).max(self.label_min_width)
    }
}
