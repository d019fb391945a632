pub(crate) mod scene_builder;
