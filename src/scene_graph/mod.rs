pub mod light;
pub mod material;
pub mod object3d;
pub mod scene;
pub mod transform;

pub use light::Lighting;
pub use material::StandardMaterial;
pub use object3d::{Object3D, ObjectId};
pub use scene::Scene;
pub use transform::Transform;
