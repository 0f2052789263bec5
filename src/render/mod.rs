/// CPU preview compositor.
pub mod preview;
