pub(crate) mod amplitude;
pub(crate) mod cues;
