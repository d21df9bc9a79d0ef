/// First top-level function in `content` whose name starts with `prefix` and
/// ends with `suffix`.
///
/// Line scan only: a candidate line must contain `func <prefix>` and `suffix`;
/// the name runs from after `func ` up to the first space or `(`.
pub fn find_func_name(content: &str, prefix: &str, suffix: &str) -> Option<String> {
    let marker = format!("func {prefix}");
    content
        .lines()
        .filter(|line| line.contains(&marker) && line.contains(suffix))
        .find_map(|line| {
            let start = line.find("func ")? + "func ".len();
            let rest = &line[start..];
            let end = rest.find([' ', '('])?;
            let name = &rest[..end];
            (end > 0 && name.starts_with(prefix) && name.ends_with(suffix))
                .then(|| name.to_string())
        })
}

/// `NewXxxServer` constructor in a goctl-generated `*_server.go`.
pub fn find_new_server_fn(content: &str) -> Option<String> {
    find_func_name(content, "New", "Server")
}

/// `RegisterXxxServer` in a protoc-generated `*_grpc.pb.go`.
pub fn find_register_fn(content: &str) -> Option<String> {
    find_func_name(content, "Register", "Server")
}
