pub(crate) mod declaration;
pub(crate) mod interp;
pub(crate) mod path;
pub(crate) mod primitive;
pub(crate) mod timing;
