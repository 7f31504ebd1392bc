pub trait PlayerRegistry {
    /// "Last, First" display name for a player identity.
    fn sort_name(&self, id: &str) -> Option<String>;
}

impl<F: Fn(&str) -> Option<String>> PlayerRegistry for F {
    fn sort_name(&self, id: &str) -> Option<String> {
        self(id)
    }
}
