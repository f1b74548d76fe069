/// Options threaded into human-readable formatting.
///
/// `verbose` adds descriptor locations and profile ids to dependency listings.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DisplayOptions {
    pub verbose: bool,
}

impl DisplayOptions {
    pub fn verbose() -> Self {
        Self { verbose: true }
    }
}
