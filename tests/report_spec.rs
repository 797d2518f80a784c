use std::collections::HashMap;
use std::fs;

use milkyway_stats::milkyway::chart::{aggregate_by_user, chart_slices, write_chart_stats_csv};
use milkyway_stats::milkyway::report::{write_player_csv, write_seed_csv, write_summary_txt};
use milkyway_stats::{Platform, PlayerRecord, SeedAggregate, Summary};

fn player(user_id: i64, platform: Platform, name: &str, capacity: &str) -> PlayerRecord {
    PlayerRecord {
        seed: 12345678,
        stars: 64,
        resource_multiplier: "1.0".to_string(),
        combat_difficulty: "和平模式".to_string(),
        user_id,
        platform,
        account_name: name.to_string(),
        generation_capacity: capacity.to_string(),
        is_anonymous: false,
    }
}

#[test]
fn player_csv_quotes_awkward_names() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("players.csv");

    let players = vec![
        player(1, Platform::Steam, "plain", "1.50 GW"),
        player(2, Platform::WeGame, "comma, name", "999 W"),
        player(3, Platform::Standalone, "he said \"hi\"", "25.0 GW"),
    ];
    write_player_csv(&path, &players).unwrap();

    let content = fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len(), 4);
    assert_eq!(lines[0], "种子,星数,资源倍率,战斗难度,用户ID,平台,账号,发电量,匿名");
    assert!(lines[1].contains(",plain,"));
    assert!(lines[2].contains("\"comma, name\""));
    assert!(lines[3].contains("\"he said \"\"hi\"\"\""));
    assert!(lines[1].ends_with(",false"));
}

#[test]
fn seed_csv_has_fixed_columns() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("all.csv");

    let seeds = vec![SeedAggregate {
        seed: 11111111,
        stars: 64,
        resource_multiplier: "无限".to_string(),
        combat_difficulty: "30".to_string(),
        player_count: 17,
        total_generation_capacity: "250 TW".to_string(),
    }];
    write_seed_csv(&path, &seeds).unwrap();

    let content = fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines[0], "种子,星数,资源倍率,战斗难度,用户数,总发电量");
    assert_eq!(lines[1], "11111111,64,无限,30,17,250 TW");
}

#[test]
fn summary_txt_has_four_fixed_lines() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("summary.txt");

    let summary = Summary {
        total_players: 1000,
        total_generation_capacity: "1.50 PW".to_string(),
        total_sails_launched: 55,
        total_dyson_spheres: 3,
    };
    write_summary_txt(&path, &summary).unwrap();

    let content = fs::read_to_string(&path).unwrap();
    assert_eq!(content, "总玩家数: 1000\n总发电量: 1.50 PW\n总太阳帆数: 55\n总戴森球数: 3\n");
}

#[test]
fn aggregation_merges_names_and_sums_watts() {
    let players = vec![
        player(100, Platform::Steam, "Alice", "1.00 PW"),
        player(100, Platform::Steam, "Alicia", "2.00 PW"),
        player(200, Platform::Steam, "Bob", "500 TW"),
        player(300, Platform::WeGame, "NotCounted", "9.00 PW"),
    ];

    let aggregated = aggregate_by_user(&players);
    assert_eq!(aggregated.len(), 2, "non-Steam platforms must be skipped");

    let alice = &aggregated[&100];
    assert_eq!(alice.total_watts, 3_000_000_000_000_000);
    let names: Vec<&str> = alice.names.iter().map(String::as_str).collect();
    assert_eq!(names, ["Alice", "Alicia"]);

    assert_eq!(aggregated[&200].total_watts, 500_000_000_000_000);
}

#[test]
fn chart_slices_fold_the_remainder() {
    let mut aggregated = HashMap::new();
    for (id, names, watts) in [
        (1i64, "First", 4_000_000_000_000_000i64),
        (2, "Second", 3_000_000_000_000_000),
        (3, "Third", 2_000_000_000_000_000),
        (4, "Fourth", 1_000_000_000_000_000),
    ] {
        let players = vec![player(id, Platform::Steam, names, "0 W")];
        let partial = aggregate_by_user(&players);
        let mut agg = partial[&id].clone();
        agg.total_watts = watts;
        aggregated.insert(id, agg);
    }

    let slices = chart_slices(&aggregated, 2);
    assert_eq!(slices.len(), 3);
    assert_eq!(slices[0].label, "First");
    assert_eq!(slices[0].watts, 4_000_000_000_000_000);
    assert_eq!(slices[1].label, "Second");
    assert_eq!(slices[2].label, "杂鱼们 (共2 杂鱼)\n(3.0 PW)");
    assert_eq!(slices[2].watts, 3_000_000_000_000_000);

    // Few enough users: no remainder slice
    let slices = chart_slices(&aggregated, 10);
    assert_eq!(slices.len(), 4);
}

#[test]
fn chart_stats_csv_is_ranked_descending() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("stats.csv");

    let players = vec![
        player(7, Platform::Steam, "Small", "1.00 TW"),
        player(9, Platform::Steam, "Big", "2.00 PW"),
    ];
    let aggregated = aggregate_by_user(&players);
    write_chart_stats_csv(&path, &aggregated).unwrap();

    let content = fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines[0], "Rank,Steam ID,Names,Generation Capacity (PW)");
    assert_eq!(lines[1], "1,9,Big,2.00");
    assert_eq!(lines[2], "2,7,Small,0.00");
}
