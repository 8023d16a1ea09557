/// Application layer modules
///
/// - Services: manifest resolution inside an initialized checkout
/// - Use cases: the end-to-end source repository lookup workflow
pub mod services;
pub mod use_cases;
