mod reconcile;

pub use reconcile::{ReconcileError, UserReconciler};
