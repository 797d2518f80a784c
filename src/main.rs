use std::env;
use std::process;

use milkyway_stats::milkyway::MilkywayClient;
use milkyway_stats::{Config, Result};

fn print_usage(program: &str) {
    eprintln!("Usage: {program} [--platform <id>] <command>");
    eprintln!();
    eprintln!("Commands:");
    eprintln!("  statistics                                     Fetch the galaxy summary");
    eprintln!("  full                                           Download the full leaderboard data");
    eprintln!("  userdata                                       Download the flat user listing");
    eprintln!("  cluster <seed> <stars> <mult> <diff> [pages]   Download one seed's players");
    eprintln!("                                                 (mult/diff are raw key digits)");
    eprintln!("  chart [min_tw] [top_n]                         Aggregate capacity per user");
    eprintln!();
    eprintln!("Platform ids: 1=Steam (default), 2=WeGame, 3=XGP, 0=Standalone");
    eprintln!("Reports are written to the output/ directory.");
}

fn parse_arg<T: std::str::FromStr>(args: &[String], index: usize, name: &str) -> T {
    let Some(raw) = args.get(index) else {
        eprintln!("ERROR: missing argument <{name}>");
        process::exit(1);
    };
    match raw.parse() {
        Ok(value) => value,
        Err(_) => {
            eprintln!("ERROR: invalid {name}: {raw}");
            process::exit(1);
        }
    }
}

fn print_summary(summary: &milkyway_stats::Summary) {
    println!("总玩家数: {}", summary.total_players);
    println!("总发电量: {}", summary.total_generation_capacity);
    println!("总太阳帆数: {}", summary.total_sails_launched);
    println!("总戴森球数: {}", summary.total_dyson_spheres);
}

fn run(client: &MilkywayClient, command: &str, args: &[String]) -> Result<()> {
    match command {
        "statistics" => {
            let summary = client.download_statistics()?;
            println!("{}", "=".repeat(60));
            print_summary(&summary);
        }
        "full" => {
            let full = client.download_full_data()?;
            println!("{}", "=".repeat(60));
            println!("Top ten records: {}", full.top_ten.len());
            println!("Seed records:    {}", full.seeds.len());
            print_summary(&full.summary);
        }
        "userdata" => {
            let players = client.download_user_data()?;
            println!("{}", "=".repeat(60));
            println!("User records: {}", players.len());
        }
        "cluster" => {
            let seed: i64 = parse_arg(args, 0, "seed");
            let stars: i32 = parse_arg(args, 1, "stars");
            let mult_raw: i32 = parse_arg(args, 2, "mult");
            let diff_raw: i32 = parse_arg(args, 3, "diff");
            let max_pages: u32 = if args.len() > 4 { parse_arg(args, 4, "pages") } else { 10 };

            let players = client.download_cluster_players(seed, stars, mult_raw, diff_raw, max_pages)?;
            println!("{}", "=".repeat(60));
            println!("Cluster records: {}", players.len());
        }
        "chart" => {
            let min_tw: i64 = if !args.is_empty() { parse_arg(args, 0, "min_tw") } else { 200 };
            let top_n: usize = if args.len() > 1 { parse_arg(args, 1, "top_n") } else { 20 };

            let full = client.download_full_data()?;
            let slices = client.chart_pipeline(&full.seeds, min_tw * 1_000_000_000_000, top_n, 2)?;

            println!("{}", "=".repeat(60));
            for slice in &slices {
                println!("{:>8.2} PW  {}", slice.watts as f64 / 1e15, slice.label.replace('\n', " "));
            }
        }
        _ => {
            eprintln!("ERROR: unknown command: {command}");
            process::exit(1);
        }
    }
    Ok(())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut args: Vec<String> = env::args().collect();
    let program = args.remove(0);

    // Pull out --platform before positional parsing
    let mut platform: u8 = 1;
    if let Some(flag_idx) = args.iter().position(|a| a == "--platform") {
        if flag_idx + 1 >= args.len() {
            eprintln!("ERROR: --platform flag requires an argument.");
            process::exit(1);
        }
        match args[flag_idx + 1].parse() {
            Ok(id) => platform = id,
            Err(_) => {
                eprintln!("ERROR: invalid platform id: {}", args[flag_idx + 1]);
                process::exit(1);
            }
        }
        args.drain(flag_idx..=flag_idx + 1);
    }

    if args.is_empty() {
        print_usage(&program);
        process::exit(1);
    }

    let command = args.remove(0);
    let client = MilkywayClient::new(Config::default(), platform);

    if let Err(e) = run(&client, &command, &args) {
        eprintln!("\nERROR: {command} failed");
        eprintln!("  {e}");
        process::exit(1);
    }
}
