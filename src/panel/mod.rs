pub(crate) mod control;
