#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use clap::Parser;

    use crate::cli::{Cli, Command, parse_namespace_prefix};

    #[test]
    fn test_parse_namespace_prefix() {
        assert_eq!(parse_namespace_prefix("__ns_"), Ok("__ns_".to_string()));
        assert_eq!(parse_namespace_prefix("$m"), Ok("$m".to_string()));
        assert!(parse_namespace_prefix("").is_err());
        assert!(parse_namespace_prefix("1ns").is_err());
        assert_eq!(
            parse_namespace_prefix("ns-"),
            Err("Namespace prefix cannot contain '-': 'ns-'".to_string())
        );
    }

    #[test]
    fn test_inline_args() {
        let cli = Cli::parse_from([
            "inlay",
            "inline",
            "dist",
            "--pattern",
            "assets/*.js",
            "--pattern",
            "assets/*.css",
            "--keep-inlined",
            "--cdata",
            "--json",
        ]);

        let Command::Inline(args) = cli.command else {
            panic!("expected inline command");
        };
        assert_eq!(args.dir, PathBuf::from("dist"));
        assert_eq!(args.patterns, vec!["assets/*.js", "assets/*.css"]);
        assert!(args.keep_inlined);
        assert!(args.cdata);
        assert!(args.json);
        assert!(!args.remove_module_loader);
        assert!(args.out_dir.is_none());
    }

    #[test]
    fn test_link_args_with_global_flags() {
        let cli = Cli::parse_from([
            "inlay",
            "link",
            "dist/assets",
            "index.js",
            "--namespace-prefix",
            "$c_",
            "--verbose",
        ]);

        assert!(cli.verbose);
        let Command::Link(args) = cli.command else {
            panic!("expected link command");
        };
        assert_eq!(args.entry, "index.js");
        assert_eq!(args.namespace_prefix.as_deref(), Some("$c_"));
    }

    #[test]
    fn test_verbose_conflicts_with_quiet() {
        let result = Cli::try_parse_from(["inlay", "-v", "-q", "inline", "dist"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_invalid_prefix_is_rejected() {
        let result = Cli::try_parse_from(["inlay", "link", "dist", "a.js", "--namespace-prefix", "9"]);
        assert!(result.is_err());
    }
}
