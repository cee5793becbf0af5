fn main() {
    #[cfg(feature = "cli")]
    retrolz::cli::run();

    #[cfg(not(feature = "cli"))]
    {
        eprintln!("retrolz: CLI not enabled. Rebuild with `--features cli`.");
        std::process::exit(1);
    }
}
