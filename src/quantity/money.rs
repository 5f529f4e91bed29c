quantity!(Pounds, "GBP");

impl Pounds {
    /// Extrapolate a daily amount over a non-leap year.
    #[must_use]
    pub fn per_year(self) -> Self {
        Self(self.0 * 365.0)
    }
}
