/// Domain layer modules
///
/// Pure types and rules with no I/O:
/// - Manifest repository URLs and checkout tool versions (value objects)
/// - Manifest documents and project matching (entities)
pub mod entities;
pub mod value_objects;
