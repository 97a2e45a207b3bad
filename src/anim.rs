pub mod animator;
pub mod frame;
pub mod needle;
