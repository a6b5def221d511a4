/*
 * Everything the activities API sends or accepts, exported flat for ease of use.
*/

mod activity;
pub use activity::*;
mod wire;
pub use wire::*;
