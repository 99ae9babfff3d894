mod connection;
mod core;
mod diagnostics;
mod edge;
mod indexed;
mod intersect;
mod lanes;
mod metrics;
mod normals;
mod polygon;
mod refiner;
mod skin;
mod tangents;
mod topology;
mod transform;
mod triangulation;

pub use connection::ConnectionData;
pub use self::core::{BBox2, BBox3, Float2, Float3, Float4, Float4x4, Quatf, Tolerance};
pub use diagnostics::RefineDiagnostics;
pub use edge::{on_edge, select_edge, select_edge_indices, select_edge_with};
pub use indexed::{IndexedArray, IndexedIter, VertexIndex};
pub use intersect::{
    FlatTriangles, IndexedTriangles, QueryError, RayHit, SoaTriangles, TriangleLayout,
    ray_triangles_intersection, ray_triangles_intersection_generic,
    ray_triangles_intersection_lanes,
};
pub use lanes::{ExecPath, Float3x8, LANES, Lane, Mask, active_mask};
pub use metrics::{RefineMetrics, RefineTimingReport, TimingBucket};
pub use normals::{corner_normals, face_normals, vertex_normals};
pub use polygon::{
    PolygonLayout, SoaPolygon, min_max, min_max_generic, min_max_lanes, poly_inside,
    poly_inside_generic, poly_inside_lanes,
};
pub use refiner::{
    MeshRefiner, RefineError, RefineSettings, RefinedMesh, Split, SplitView, Stage, Submesh,
};
pub use skin::Weights4;
pub use tangents::corner_tangents;
pub use topology::{FaceSet, Topology, TopologyError};
pub use transform::{
    TransformError, mul_points, mul_points_generic, mul_points_lanes, mul_vectors,
    mul_vectors_generic, mul_vectors_lanes,
};
pub use triangulation::{TriangulationPolicy, fan_triangles, newell_normal, triangulate_polygon};

#[cfg(test)]
mod tests;
