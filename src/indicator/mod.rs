pub(crate) mod waypoint;
