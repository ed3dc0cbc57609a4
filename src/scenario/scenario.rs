use crate::error::Result;
use crate::graph::graph::Graph;

/// Something that can produce a water network to analyse.
pub trait NetworkSource {
    fn name(&self) -> String;
    fn build(&self) -> Result<Graph>;
}
