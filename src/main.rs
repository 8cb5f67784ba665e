//
// Copyright (c) Pirmin Kalberer. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.
//

#[macro_use]
extern crate clap;
#[macro_use]
extern crate log;

use clap::{App, AppSettings, ArgMatches, SubCommand};
use dotenv::dotenv;
use env_logger::Builder;
use geopdf_core::core::config::{read_config, ApplicationCfg, BboxCfg, Config, MapCfg};
use geopdf_service::PdfHandler;
use log::Record;
use std::env;
use std::io::Write;
use std::process;
use time;

fn init_logger(args: &ArgMatches<'_>) {
    let mut builder = Builder::new();
    builder.format(|buf, record: &Record<'_>| {
        let t = time::now();
        let timestamp = time::strftime("%Y-%m-%d %H:%M:%S", &t).unwrap_or_default();
        writeln!(
            buf,
            "{}.{:03} {} {}",
            timestamp,
            t.tm_nsec / 1000_000,
            record.level(),
            record.args()
        )
    });

    let rust_log = match (args.value_of("loglevel"), env::var("RUST_LOG")) {
        (None, Ok(rust_log_env)) => rust_log_env,
        (loglevel, _) => match loglevel.unwrap_or("info") {
            "debug" => "debug,tera=info".to_string(),
            loglevel => loglevel.to_string(),
        },
    };
    builder.parse_filters(&rust_log);

    builder.init();
}

/// Parse `minx,miny,maxx,maxy[,crs]`
fn parse_bbox(numlist: &str) -> Result<BboxCfg, String> {
    let parts: Vec<&str> = numlist.split(',').map(str::trim).collect();
    if parts.len() != 4 && parts.len() != 5 {
        return Err(format!("Expected minx,miny,maxx,maxy[,crs] instead of `{}`", numlist));
    }
    let mut coords = [0.0; 4];
    for (i, part) in parts.iter().take(4).enumerate() {
        coords[i] = part
            .parse()
            .map_err(|_| format!("Error parsing `{}` in 'bbox' as float value", part))?;
    }
    Ok(BboxCfg {
        minx: coords[0],
        miny: coords[1],
        maxx: coords[2],
        maxy: coords[3],
        crs: parts.get(4).map(|crs| crs.to_string()),
    })
}

fn config_from_args(args: &ArgMatches<'_>) -> Result<ApplicationCfg, String> {
    let path = args.value_of("config").unwrap_or("geopdf.toml");
    info!("Reading configuration from '{}'", path);
    let mut config: ApplicationCfg = read_config(path)?;
    if let Some(output) = args.value_of("output") {
        config.document.output_dir = output.to_string();
    }
    if let Some(name) = args.value_of("name") {
        config.document.name = Some(name.to_string());
    }
    if let Some(numlist) = args.value_of("bbox") {
        config.map = Some(MapCfg {
            bbox: Some(parse_bbox(numlist)?),
        });
    }
    Ok(config)
}

fn create(args: &ArgMatches<'_>) -> Result<(), String> {
    let config = config_from_args(args)?;
    let mut handler = PdfHandler::from_config(&config)?;
    handler.talker_mut().progress = args.value_of("progress").map_or(true, |s| s != "false");
    if args.is_present("runtime-config") {
        println!("{}", handler.gen_runtime_config());
    }
    let path = handler.create().map_err(|e| e.to_string())?;
    println!("{}", path.display());
    Ok(())
}

fn main() {
    dotenv().ok();
    let mut app = App::new("geopdf")
        .version(crate_version!())
        .author("Pirmin Kalberer <pka@sourcepole.ch>")
        .about("Renders map services, GPS tracks and grids into georeferenced PDF maps")
        .subcommand(SubCommand::with_name("create")
                        .setting(AppSettings::AllowLeadingHyphen)
                        .args_from_usage("-c, --config=<FILE> 'Load from custom config file'
                                              --loglevel=[error|warn|info|debug|trace] 'Log level (Default: info)'
                                              --output=[DIR] 'Output directory'
                                              --name=[NAME] 'Document name'
                                              --bbox=[minx,miny,maxx,maxy[,crs]] 'Map extent'
                                              --progress=[true|false] 'Show progress bar'
                                              --runtime-config 'Print the effective configuration'")
                        .about("Create a PDF map"))
        .subcommand(SubCommand::with_name("genconfig")
                        .args_from_usage("--loglevel=[error|warn|info|debug|trace] 'Log level (Default: info)'")
                        .about("Generate configuration template"));

    match app.get_matches_from_safe_borrow(env::args()) {
        //app.get_matches() prohibits later call of app.print_help()
        Result::Err(e) => {
            println!("{}", e);
        }
        Result::Ok(matches) => match matches.subcommand() {
            ("create", Some(sub_m)) => {
                init_logger(sub_m);
                if let Err(e) = create(sub_m) {
                    error!("{}", e);
                    process::exit(1);
                }
            }
            ("genconfig", Some(sub_m)) => {
                init_logger(sub_m);
                println!("{}", PdfHandler::gen_config());
            }
            _ => {
                let _ = app.print_help();
                println!("");
            }
        },
    }
}
