pub type CmdResult<T> = stylefix::Result<(T, i32)>;

pub(crate) struct GlobalArgs {}

pub mod fix;
