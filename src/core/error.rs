/// Selection failures that callers may want to tell apart.
///
/// Raised through [`anyhow`], so match them with [`anyhow::Error::downcast_ref`].
#[derive(Copy, Clone, Debug, Eq, PartialEq, derive_more::Display, derive_more::Error)]
pub enum SelectionError {
    /// The rate source failed to return data for a requested range.
    #[display("the rate source is unavailable")]
    SourceUnavailable,

    /// A query expected at least one slot but got none.
    #[display("no rates are published for the requested period")]
    EmptySeries,

    /// More slots were requested than there are available.
    #[display("requested {requested} slots, but only {available} are available")]
    Unsatisfiable { requested: usize, available: usize },
}
