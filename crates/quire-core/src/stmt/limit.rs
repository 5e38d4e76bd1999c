#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Limit {
    /// Maximum number of rows to return
    pub limit: Option<u64>,

    /// Number of rows to skip
    pub offset: Option<u64>,
}

impl Limit {
    pub fn is_empty(&self) -> bool {
        self.limit.is_none() && self.offset.is_none()
    }
}
