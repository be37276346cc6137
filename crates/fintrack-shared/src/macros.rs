#[macro_export]
macro_rules! internal_error {
    ($arg: expr) => {{
        let internal_error_msg = format!(
            "{}\ninternal error: {}:{}:{}",
            $arg,
            file!(),
            line!(),
            column!()
        );
        tracing::error!(?internal_error_msg);
        internal_error_msg
    }};
}
