use milkyway_stats::milkyway::capacity::{format_generation_capacity, parse_power_to_watts};
use milkyway_stats::milkyway::keycodec::{
    combat_difficulty_to_raw, decode_seed_key, encode_seed_key, resource_multiplier_to_raw,
};
use milkyway_stats::milkyway::reader::ByteReader;
use milkyway_stats::milkyway::records::{
    decode_cluster_page, decode_full_data, decode_statistics, decode_top_ten, decode_user_data,
};
use milkyway_stats::{MilkywayError, Platform};

// --- Fixture builders ---

fn push_varint(buf: &mut Vec<u8>, mut value: u32) {
    loop {
        let byte = (value & 0x7F) as u8;
        value >>= 7;
        if value == 0 {
            buf.push(byte);
            break;
        }
        buf.push(byte | 0x80);
    }
}

fn push_str(buf: &mut Vec<u8>, s: &str) {
    push_varint(buf, s.len() as u32);
    buf.extend_from_slice(s.as_bytes());
}

struct PlayerFixture {
    seed_key: i64,
    user_id: i64,
    platform: u8,
    name: &'static str,
    ticks: i64,
    anon: u8,
}

fn push_player(buf: &mut Vec<u8>, p: &PlayerFixture) {
    buf.extend_from_slice(&p.seed_key.to_le_bytes());
    buf.extend_from_slice(&p.user_id.to_le_bytes());
    buf.push(p.platform);
    push_str(buf, p.name);
    buf.extend_from_slice(&p.ticks.to_le_bytes());
    buf.push(p.anon);
}

const PLAYERS: &[PlayerFixture] = &[
    PlayerFixture {
        seed_key: encode_key(12345678, 64, 10, 0),
        user_id: 0x0111_0001_0000_0003,
        platform: 1,
        name: "Alice",
        ticks: 25_000_000,
        anon: 0,
    },
    PlayerFixture {
        seed_key: encode_key(98765432, 32, 99, 103),
        user_id: 42,
        platform: 2,
        name: "戴森球建造者",
        ticks: 0,
        anon: 1,
    },
    PlayerFixture {
        seed_key: encode_key(1, 1, 0, 199),
        user_id: -1,
        platform: 7,
        name: "Bob, the \"Builder\"",
        ticks: 4_166_666_666_650,
        anon: 0,
    },
];

// const-friendly mirror of encode_seed_key for the fixture table
const fn encode_key(seed: i64, stars: i64, mult_raw: i64, diff_raw: i64) -> i64 {
    seed * 100_000_000 + stars * 100_000 + mult_raw * 1000 + diff_raw
}

fn top_ten_payload(players: &[PlayerFixture]) -> Vec<u8> {
    let mut buf = Vec::new();
    buf.extend_from_slice(&0x0000_0001u32.to_le_bytes()); // reserved block tag
    buf.extend_from_slice(&(players.len() as i32).to_le_bytes());
    for p in players {
        push_player(&mut buf, p);
    }
    buf
}

// --- VarInt ---

#[test]
fn varint_roundtrips() {
    let values = [
        0u32,
        1,
        0x7F,
        0x80,
        300,
        0x3FFF,
        0x4000,
        123_456_789,
        u32::MAX - 1,
        u32::MAX,
    ];
    for v in values {
        let mut buf = Vec::new();
        push_varint(&mut buf, v);
        assert!(buf.len() <= 5, "encoding of {v} too long");

        let mut r = ByteReader::new(&buf);
        assert_eq!(r.read_varint32().unwrap(), v);
        assert_eq!(r.remaining(), 0, "decode of {v} did not consume the encoding");
    }
}

#[test]
fn varint_with_five_continuation_bytes_is_rejected() {
    let mut r = ByteReader::new(&[0xFF, 0xFF, 0xFF, 0xFF, 0xFF]);
    assert!(matches!(r.read_varint32(), Err(MilkywayError::VarIntTooLong)));
}

#[test]
fn varint_stops_at_first_terminator() {
    // 0x85 0x01 = 133; the trailing bytes belong to the next field
    let mut r = ByteReader::new(&[0x85, 0x01, 0xAA, 0xBB]);
    assert_eq!(r.read_varint32().unwrap(), 133);
    assert_eq!(r.offset(), 2);
}

// --- Seed key codec ---

#[test]
fn seed_key_recovers_raw_fields() {
    for &seed in &[0i64, 1, 12345678, 99999999] {
        for &stars in &[1i32, 32, 64, 999] {
            for &mult_raw in &[0i32, 1, 10, 50, 99] {
                for &diff_raw in &[0i32, 1, 99, 100, 103, 130, 199] {
                    let key = encode_seed_key(seed, stars, mult_raw, diff_raw);
                    let parts = decode_seed_key(key);
                    assert_eq!(parts.seed, seed, "seed mismatch for key {key}");
                    assert_eq!(parts.stars, stars, "stars mismatch for key {key}");
                }
            }
        }
    }
}

#[test]
fn seed_key_display_strings() {
    let parts = decode_seed_key(encode_seed_key(42, 64, 10, 0));
    assert_eq!(parts.resource_multiplier, "1.0");
    assert_eq!(parts.combat_difficulty, "和平模式");

    let parts = decode_seed_key(encode_seed_key(42, 64, 99, 103));
    assert_eq!(parts.resource_multiplier, "无限");
    assert_eq!(parts.combat_difficulty, "3");

    let parts = decode_seed_key(encode_seed_key(42, 64, 5, 130));
    assert_eq!(parts.resource_multiplier, "0.5");
    assert_eq!(parts.combat_difficulty, "30");
}

#[test]
fn display_inverses_reconstruct_raw_digits() {
    assert_eq!(resource_multiplier_to_raw("无限"), Some(99));
    assert_eq!(resource_multiplier_to_raw("1.0"), Some(10));
    assert_eq!(resource_multiplier_to_raw("0.5"), Some(5));
    assert_eq!(resource_multiplier_to_raw("not a number"), None);

    // single digit reconstructs as "10"+d, longer as "1"+ds
    assert_eq!(combat_difficulty_to_raw("和平模式"), Some(0));
    assert_eq!(combat_difficulty_to_raw("3"), Some(103));
    assert_eq!(combat_difficulty_to_raw("30"), Some(130));
}

// --- Capacity formatting ---

#[test]
fn capacity_formatting_vectors() {
    assert_eq!(format_generation_capacity(1_500_000_000), "1.50 GW");
    assert_eq!(format_generation_capacity(999), "999 W");
    assert_eq!(format_generation_capacity(250_000_000_000_000), "250 TW");
    assert_eq!(format_generation_capacity(0), "0 W");
    assert_eq!(format_generation_capacity(1), "1.00 W");
    assert_eq!(format_generation_capacity(25_000_000_000), "25.0 GW");
    assert_eq!(format_generation_capacity(2_000_000_000_000_000), "2.00 PW");
}

#[test]
fn power_parsing_inverts_formatting() {
    for &watts in &[
        1i64,
        999,
        1_000,
        25_000_000_000,
        1_500_000_000,
        250_000_000_000_000,
        2_000_000_000_000_000,
    ] {
        let formatted = format_generation_capacity(watts);
        let parsed = parse_power_to_watts(&formatted);
        // Display strings round to at most three significant digits, so
        // allow the same relative slack when parsing back.
        let slack = watts / 100;
        assert!(
            (parsed - watts).abs() <= slack,
            "{watts} -> {formatted} -> {parsed}"
        );
    }
    assert_eq!(parse_power_to_watts("1,000 kW"), 1_000_000);
    assert_eq!(parse_power_to_watts("100 k"), 100_000);
    assert_eq!(parse_power_to_watts("garbage"), 0);
}

// --- Record decoders ---

#[test]
fn top_ten_roundtrip() {
    let payload = top_ten_payload(PLAYERS);
    let mut r = ByteReader::new(&payload);
    let decoded = decode_top_ten(&mut r).unwrap();

    assert_eq!(decoded.len(), 3);
    assert_eq!(r.remaining(), 0);

    let alice = &decoded[0];
    assert_eq!(alice.seed, 12345678);
    assert_eq!(alice.stars, 64);
    assert_eq!(alice.resource_multiplier, "1.0");
    assert_eq!(alice.combat_difficulty, "和平模式");
    assert_eq!(alice.user_id, 0x0111_0001_0000_0003);
    assert_eq!(alice.platform, Platform::Steam);
    assert_eq!(alice.account_name, "Alice");
    assert_eq!(alice.generation_capacity, "1.50 GW"); // 25_000_000 ticks * 60
    assert!(!alice.is_anonymous);

    let builder = &decoded[1];
    assert_eq!(builder.platform, Platform::WeGame);
    assert_eq!(builder.account_name, "戴森球建造者");
    assert_eq!(builder.resource_multiplier, "无限");
    assert_eq!(builder.combat_difficulty, "3");
    assert_eq!(builder.generation_capacity, "0 W");
    assert!(builder.is_anonymous);

    let bob = &decoded[2];
    assert_eq!(bob.platform, Platform::Standalone); // unknown id falls back
    assert_eq!(bob.account_name, "Bob, the \"Builder\"");
    assert_eq!(bob.combat_difficulty, "99");
    assert_eq!(bob.generation_capacity, "250 TW");
    assert_eq!(bob.user_id, -1);
}

#[test]
fn truncated_record_aborts_decode() {
    let payload = top_ten_payload(PLAYERS);
    // Chop the buffer in the middle of the last record
    let truncated = &payload[..payload.len() - 5];
    let mut r = ByteReader::new(truncated);
    match decode_top_ten(&mut r) {
        Err(MilkywayError::UnexpectedEndOfData { .. }) => {}
        other => panic!("expected UnexpectedEndOfData, got {other:?}"),
    }
}

#[test]
fn invalid_utf8_name_is_replaced_not_rejected() {
    let mut buf = Vec::new();
    buf.extend_from_slice(&0u32.to_le_bytes());
    buf.extend_from_slice(&1i32.to_le_bytes());

    buf.extend_from_slice(&encode_key(7, 1, 10, 0).to_le_bytes());
    buf.extend_from_slice(&1i64.to_le_bytes());
    buf.push(1);
    push_varint(&mut buf, 4);
    buf.extend_from_slice(&[b'A', 0xFF, 0xFE, b'Z']); // invalid UTF-8 inside
    buf.extend_from_slice(&0i64.to_le_bytes());
    buf.push(0);

    let mut r = ByteReader::new(&buf);
    let decoded = decode_top_ten(&mut r).unwrap();
    assert_eq!(decoded.len(), 1);
    assert!(decoded[0].account_name.starts_with('A'));
    assert!(decoded[0].account_name.ends_with('Z'));
    assert!(decoded[0].account_name.contains('\u{FFFD}'));
}

#[test]
fn user_data_payload_decodes() {
    let mut buf = Vec::new();
    buf.extend_from_slice(&7i32.to_le_bytes()); // reserved header
    buf.extend_from_slice(&2i32.to_le_bytes());
    push_player(&mut buf, &PLAYERS[0]);
    push_player(&mut buf, &PLAYERS[1]);

    let decoded = decode_user_data(&buf).unwrap();
    assert_eq!(decoded.len(), 2);
    assert_eq!(decoded[0].account_name, "Alice");
    assert_eq!(decoded[1].account_name, "戴森球建造者");
}

#[test]
fn cluster_page_caps_records_at_page_size() {
    let mut buf = Vec::new();
    buf.extend_from_slice(&0i32.to_le_bytes()); // reserved header
    buf.extend_from_slice(&137i64.to_le_bytes()); // cross-page total
    buf.extend_from_slice(&4i32.to_le_bytes()); // page index
    buf.extend_from_slice(&12i32.to_le_bytes()); // declared count over the cap
    for _ in 0..10 {
        push_player(&mut buf, &PLAYERS[0]);
    }

    let page = decode_cluster_page(&buf).unwrap();
    assert_eq!(page.total_count, 137);
    assert_eq!(page.page_index, 4);
    assert_eq!(page.players.len(), 10);
}

#[test]
fn statistics_payload_decodes() {
    let mut buf = Vec::new();
    buf.extend_from_slice(&3i32.to_le_bytes()); // reserved header
    buf.extend_from_slice(&25_000_000i64.to_le_bytes()); // ticks -> 1.50 GW
    buf.extend_from_slice(&123_456i64.to_le_bytes());
    buf.extend_from_slice(&99i32.to_le_bytes());
    buf.extend_from_slice(&7i32.to_le_bytes());

    let summary = decode_statistics(&buf).unwrap();
    assert_eq!(summary.total_players, 99);
    assert_eq!(summary.total_generation_capacity, "1.50 GW");
    assert_eq!(summary.total_sails_launched, 123_456);
    assert_eq!(summary.total_dyson_spheres, 7);
}

#[test]
fn full_data_consumes_trailing_seed_field() {
    let mut buf = Vec::new();
    buf.extend_from_slice(&1u32.to_le_bytes()); // file tag

    // top-ten block with one player
    buf.extend_from_slice(&1u32.to_le_bytes());
    buf.extend_from_slice(&1i32.to_le_bytes());
    push_player(&mut buf, &PLAYERS[0]);

    // summary block
    buf.extend_from_slice(&1u32.to_le_bytes());
    buf.extend_from_slice(&25_000_000i64.to_le_bytes());
    buf.extend_from_slice(&55i64.to_le_bytes());
    buf.extend_from_slice(&1000i32.to_le_bytes());
    buf.extend_from_slice(&3i32.to_le_bytes());

    // per-seed block with two records, each followed by the unused u32;
    // the second record only decodes correctly if the first one's
    // trailing field was consumed
    buf.extend_from_slice(&1u32.to_le_bytes());
    buf.extend_from_slice(&2i32.to_le_bytes());

    buf.extend_from_slice(&encode_key(11111111, 64, 10, 0).to_le_bytes());
    buf.extend_from_slice(&416_666_670.0f32.to_le_bytes()); // ~25 GW
    buf.extend_from_slice(&17i32.to_le_bytes());
    buf.extend_from_slice(&0xDEAD_BEEFu32.to_le_bytes());

    buf.extend_from_slice(&encode_key(22222222, 32, 99, 103).to_le_bytes());
    buf.extend_from_slice(&0.0f32.to_le_bytes());
    buf.extend_from_slice(&1i32.to_le_bytes());
    buf.extend_from_slice(&0xDEAD_BEEFu32.to_le_bytes());

    let full = decode_full_data(&buf).unwrap();

    assert_eq!(full.top_ten.len(), 1);
    assert_eq!(full.summary.total_players, 1000);
    assert_eq!(full.summary.total_generation_capacity, "1.50 GW");
    assert_eq!(full.summary.total_sails_launched, 55);
    assert_eq!(full.summary.total_dyson_spheres, 3);

    assert_eq!(full.seeds.len(), 2);
    assert_eq!(full.seeds[0].seed, 11111111);
    assert_eq!(full.seeds[0].player_count, 17);
    assert_eq!(full.seeds[0].total_generation_capacity, "25.0 GW");
    assert_eq!(full.seeds[1].seed, 22222222);
    assert_eq!(full.seeds[1].resource_multiplier, "无限");
    assert_eq!(full.seeds[1].total_generation_capacity, "0 W");
}

#[test]
fn empty_payload_fails_fast() {
    match decode_user_data(&[]) {
        Err(MilkywayError::UnexpectedEndOfData { offset: 0, .. }) => {}
        other => panic!("expected UnexpectedEndOfData at offset 0, got {other:?}"),
    }
}
