/// Construction options for [`WidgetSubsystem`](crate::WidgetSubsystem).
///
/// Both values are reserve hints. They change allocation behavior only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WidgetSubsystemConfig {
    /// Initial capacity of the widget registry
    pub initial_widget_capacity: usize,
    /// Initial number of owner buckets
    pub initial_owner_capacity: usize,
}

impl WidgetSubsystemConfig {
    pub const DEFAULT_WIDGET_CAPACITY: usize = 64;
    pub const DEFAULT_OWNER_CAPACITY: usize = 16;

    pub fn with_widget_capacity(mut self, capacity: usize) -> Self {
        self.initial_widget_capacity = capacity;
        self
    }

    pub fn with_owner_capacity(mut self, capacity: usize) -> Self {
        self.initial_owner_capacity = capacity;
        self
    }
}

impl Default for WidgetSubsystemConfig {
    fn default() -> Self {
        Self {
            initial_widget_capacity: Self::DEFAULT_WIDGET_CAPACITY,
            initial_owner_capacity: Self::DEFAULT_OWNER_CAPACITY,
        }
    }
}
