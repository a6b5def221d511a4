/*
 * Data exchanged with the activities API. The API owns this data, these types only mirror it.
*/

mod models;
pub use models::*;
