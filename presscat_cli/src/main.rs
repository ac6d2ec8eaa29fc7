#[macro_use] extern crate clap;
#[macro_use] extern crate log;

use presscat::*;
use clap::{Arg, App, AppSettings, SubCommand, ArgMatches};
use std::path::Path;
use std::process;

fn print_error_debug(e: &Error) {
    use std::env;
    if let Ok(_) = env::var("CI") {
        // only print debug implementation rather than unwinding
        warn!("{:?}", e);
    } else {
        // normal case - unwind the error chain
        for e in e.iter().skip(1) {
            warn!("caused by: {}", e);
        }
    }
}

fn main() {
    let app = App::new("presscat")
        .version(crate_version!())
        .setting(AppSettings::VersionlessSubcommands)
        .setting(AppSettings::SubcommandRequiredElseHelp)
        .setting(AppSettings::ColoredHelp)
        .setting(AppSettings::DeriveDisplayOrder)
        .global_settings(&[AppSettings::ColoredHelp])
        .about("Compile Wordpress sites into pod templates")
        .arg(Arg::with_name("verbose")
            .short("v")
            .multiple(true)
            .global(true)
            .help("Increase verbosity"))
        .arg(Arg::with_name("debug")
            .short("d")
            .long("debug")
            .global(true)
            .help("Adds line numbers to log statements"))
        .arg(Arg::with_name("config")
            .short("c")
            .long("config")
            .takes_value(true)
            .global(true)
            .help("Compiler config file (images and fixed paths)"))

        .subcommand(SubCommand::with_name("web")
            .about("Print the pod template of the site deployment")
            .arg(Arg::with_name("site")
                .required(true)
                .help("Wordpress resource file"))
            .arg(Arg::with_name("json")
                .long("json")
                .help("Print json instead of yaml")))

        .subcommand(SubCommand::with_name("job")
            .setting(AppSettings::TrailingVarArg)
            .about("Print the pod template of a wp-cli job")
            .arg(Arg::with_name("site")
                .required(true)
                .help("Wordpress resource file"))
            .arg(Arg::with_name("json")
                .long("json")
                .help("Print json instead of yaml"))
            .arg(Arg::with_name("cmd")
                .multiple(true)
                .help("Arguments passed to wp-cli")))

        .subcommand(SubCommand::with_name("config")
            .about("Print the effective compiler config")
            .arg(Arg::with_name("json")
                .long("json")
                .help("Print json instead of yaml")));

    // arg parse
    let args = app.get_matches();
    let name = args.subcommand_name().unwrap_or("presscat").to_string();
    let _ = run(&args).map_err(|e| {
        error!("{} error: {}", name, e);
        print_error_debug(&e);
        process::exit(1);
    });
    process::exit(0);
}

fn run(args: &ArgMatches) -> Result<()> {
    // always show INFO messages (+1)
    loggerv::Logger::new()
        .verbosity(args.occurrences_of("verbose") + 1)
        .module_path(true)
        .line_numbers(args.is_present("debug"))
        .init()
        .map_err(|e| e.to_string())?;

    // Ignore SIGPIPE errors to avoid having to use let _ = write! everywhere
    // See https://github.com/rust-lang/rust/issues/46016
    unsafe {
        libc::signal(libc::SIGPIPE, libc::SIG_DFL);
    }

    dispatch_commands(args)
}

fn output_format(args: &ArgMatches) -> OutputFormat {
    if args.is_present("json") { OutputFormat::Json } else { OutputFormat::Yaml }
}

fn print<T: serde::Serialize>(data: &T, args: &ArgMatches) -> Result<()> {
    println!("{}", presscat::encode(data, output_format(args))?);
    Ok(())
}

/// Compiler config from the global `-c` flag, wherever it was given
fn resolve_config(args: &ArgMatches, sub: &ArgMatches) -> Result<Config> {
    let pth = sub.value_of("config").or_else(|| args.value_of("config"));
    load_config(pth.map(Path::new))
}

/// Dispatch clap arguments to presscat handlers
fn dispatch_commands(args: &ArgMatches) -> Result<()> {
    if let Some(a) = args.subcommand_matches("config") {
        let conf = resolve_config(args, a)?;
        return print(&conf, a);
    }
    else if let Some(a) = args.subcommand_matches("web") {
        let conf = resolve_config(args, a)?;
        let site = a.value_of("site").unwrap(); // defined required above
        let wp = load_site(Path::new(site))?;
        info!("Compiling web pod template for {}/{}", wp.namespace(), wp.name());
        return print(&web_pod_template_spec(&wp, &conf), a);
    }
    else if let Some(a) = args.subcommand_matches("job") {
        let conf = resolve_config(args, a)?;
        let site = a.value_of("site").unwrap(); // defined required above
        let cmd: Vec<String> = a.values_of("cmd")
            .map(|xs| xs.map(String::from).collect())
            .unwrap_or_default();
        let wp = load_site(Path::new(site))?;
        info!("Compiling job pod template for {}/{}: {:?}", wp.namespace(), wp.name(), cmd);
        return print(&job_pod_template_spec(&wp, &conf, &cmd), a);
    }

    unreachable!("Subcommand valid, but not implemented")
}
