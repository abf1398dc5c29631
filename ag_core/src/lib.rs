pub mod depends;
pub mod dot;
pub mod errors;
pub mod graph;
pub mod index;
pub mod order;
pub mod testgraph;

pub use depends::extract_depends;
pub use dot::render_dot;
pub use errors::Error;
pub use graph::{AdjacencySource, DependencyGraph, GraphBuilder, Resolution};
pub use index::{PackageIndex, PackageRecord, parse_package_index};
pub use order::install_order;
pub use testgraph::{TestGraph, parse_test_graph};
