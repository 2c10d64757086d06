mod convert;

pub(crate) use convert::ConvertArgs;
