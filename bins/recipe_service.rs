fn main() -> std::process::ExitCode {
    server::bootstrap::launch(server::ServiceKind::Recipe)
}
