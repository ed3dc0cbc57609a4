pub mod edmonds_karp;
pub(crate) mod residual;
