//! Post-write notifications towards the hosting framework.

/// Path of the invoice list view.
pub const INVOICES_PATH: &str = "/dashboard/invoices";

/// Cache invalidation by path.
///
/// Called after a successful write so the host drops whatever it rendered
/// for `path`. Implementations must not block.
pub trait Revalidate: Send + Sync {
    fn revalidate_path(&self, path: &str);
}
