use crate::pagination::{PageRequest, PageResponse};

/// A paginated row collaborator, usually a list endpoint on the server.
///
/// Implementations return the requested run of pages together with paginator
/// metadata. Retries and transport errors are theirs to handle; the window
/// calculator never retries.
/// Sources must be Send + Sync so fetches can run on background threads.
pub trait PageSource: Send + Sync {
    type Row: Send;

    /// Fetches `request.pages_to_bring` consecutive pages starting at `request.page`.
    fn fetch(&self, request: &PageRequest) -> anyhow::Result<PageResponse<Self::Row>>;
}

impl<S: PageSource + ?Sized> PageSource for std::sync::Arc<S> {
    type Row = S::Row;

    fn fetch(&self, request: &PageRequest) -> anyhow::Result<PageResponse<Self::Row>> {
        (**self).fetch(request)
    }
}
