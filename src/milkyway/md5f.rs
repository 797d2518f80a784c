//! MD5F legacy digest routine.
//!
//! The game client ships an MD5 variant whose initialization vector
//! differs from RFC 1321 in state words B and D, so its digests match no
//! published MD5 output. The round structure, constants, message-word
//! schedule and rotate amounts are the standard ones; only the IV departs.
//! Reproduced bit-for-bit — digests are compared against values the
//! original routine produces.
//!
//! State lives in a per-call `[u32; 4]`, so independent call sites can
//! hash concurrently.

use byteorder::{ByteOrder, LittleEndian};
use log::trace;

/// Initialization vector. Words B and D differ from RFC 1321
/// (0xEFCDAB89 / 0x10325476 there); the server's hashes depend on these
/// exact values.
const INITIAL_STATE: [u32; 4] = [0x6745_2301, 0xEFDC_AB89, 0x98BA_DCFE, 0x1032_5746];

/// Round 1 step: a = ((a + F(b,c,d) + m + t) <<< s) + b
/// where F(x,y,z) = (x & y) | (!x & z).
#[inline(always)]
fn ff(a: u32, b: u32, c: u32, d: u32, m: u32, s: u32, t: u32) -> u32 {
    a.wrapping_add((b & c) | (!b & d))
        .wrapping_add(m)
        .wrapping_add(t)
        .rotate_left(s)
        .wrapping_add(b)
}

/// Round 2 step with G(x,y,z) = (x & z) | (y & !z).
#[inline(always)]
fn gg(a: u32, b: u32, c: u32, d: u32, m: u32, s: u32, t: u32) -> u32 {
    a.wrapping_add((b & d) | (c & !d))
        .wrapping_add(m)
        .wrapping_add(t)
        .rotate_left(s)
        .wrapping_add(b)
}

/// Round 3 step with H(x,y,z) = x ^ y ^ z.
#[inline(always)]
fn hh(a: u32, b: u32, c: u32, d: u32, m: u32, s: u32, t: u32) -> u32 {
    a.wrapping_add(b ^ c ^ d)
        .wrapping_add(m)
        .wrapping_add(t)
        .rotate_left(s)
        .wrapping_add(b)
}

/// Round 4 step with I(x,y,z) = y ^ (x | !z).
#[inline(always)]
fn ii(a: u32, b: u32, c: u32, d: u32, m: u32, s: u32, t: u32) -> u32 {
    a.wrapping_add(c ^ (b | !d))
        .wrapping_add(m)
        .wrapping_add(t)
        .rotate_left(s)
        .wrapping_add(b)
}

/// Pad a message and split it into little-endian 32-bit words.
///
/// Padding: one 0x80 byte, zero bytes until the length is ≡ 56 mod 64,
/// then the original bit length as a little-endian u64, for a total that
/// is a multiple of 64 bytes.
fn pad_message(message: &[u8]) -> Vec<u32> {
    let rem = message.len() % 64;
    let pad_zeros = if rem < 56 { 55 - rem } else { 119 - rem };

    let mut padded = message.to_vec();
    padded.push(0x80);
    padded.resize(padded.len() + pad_zeros, 0);

    let bit_len = (message.len() as u64).wrapping_mul(8);
    padded.extend_from_slice(&bit_len.to_le_bytes());

    padded.chunks_exact(4).map(LittleEndian::read_u32).collect()
}

/// Single-allocation variant of [`pad_message`].
///
/// Computes the final length up front, fills a zeroed buffer in place and
/// converts to words in one pass. Must produce output identical to
/// [`pad_message`] on every input length.
fn pad_message_opt(message: &[u8]) -> Vec<u32> {
    let rem = message.len() % 64;
    let total_bytes = if rem < 56 {
        message.len() - rem + 64
    } else {
        message.len() - rem + 128
    };

    let mut padded = vec![0u8; total_bytes];
    padded[..message.len()].copy_from_slice(message);
    padded[message.len()] = 0x80;

    let bit_len = (message.len() as u64).wrapping_mul(8);
    LittleEndian::write_u64(&mut padded[total_bytes - 8..], bit_len);

    let mut words = vec![0u32; total_bytes / 4];
    LittleEndian::read_u32_into(&padded, &mut words);
    words
}

/// Run the compression function over every 16-word block.
fn transform(state: &mut [u32; 4], words: &[u32]) {
    for x in words.chunks_exact(16) {
        let [mut a, mut b, mut c, mut d] = *state;

        // Round 1
        a = ff(a, b, c, d, x[0], 7, 0xD76A_A478);
        d = ff(d, a, b, c, x[1], 12, 0xE8C7_B756);
        c = ff(c, d, a, b, x[2], 17, 0x2420_70DB);
        b = ff(b, c, d, a, x[3], 22, 0xC1BD_CEEE);
        a = ff(a, b, c, d, x[4], 7, 0xF57C_0FAF);
        d = ff(d, a, b, c, x[5], 12, 0x4787_C62A);
        c = ff(c, d, a, b, x[6], 17, 0xA830_4613);
        b = ff(b, c, d, a, x[7], 22, 0xFD46_9501);
        a = ff(a, b, c, d, x[8], 7, 0x6980_98D8);
        d = ff(d, a, b, c, x[9], 12, 0x8B44_F7AF);
        c = ff(c, d, a, b, x[10], 17, 0xFFFF_5BB1);
        b = ff(b, c, d, a, x[11], 22, 0x895C_D7BE);
        a = ff(a, b, c, d, x[12], 7, 0x6B90_1122);
        d = ff(d, a, b, c, x[13], 12, 0xFD98_7193);
        c = ff(c, d, a, b, x[14], 17, 0xA679_438E);
        b = ff(b, c, d, a, x[15], 22, 0x49B4_0821);

        // Round 2
        a = gg(a, b, c, d, x[1], 5, 0xF61E_2562);
        d = gg(d, a, b, c, x[6], 9, 0xC040_B340);
        c = gg(c, d, a, b, x[11], 14, 0x265E_5A51);
        b = gg(b, c, d, a, x[0], 20, 0xE9B6_C7AA);
        a = gg(a, b, c, d, x[5], 5, 0xD62F_105D);
        d = gg(d, a, b, c, x[10], 9, 0x0244_1453);
        c = gg(c, d, a, b, x[15], 14, 0xD8A1_E681);
        b = gg(b, c, d, a, x[4], 20, 0xE7D3_FBC8);
        a = gg(a, b, c, d, x[9], 5, 0x21E1_CDE6);
        d = gg(d, a, b, c, x[14], 9, 0xC337_07D6);
        c = gg(c, d, a, b, x[3], 14, 0xF4D5_0D87);
        b = gg(b, c, d, a, x[8], 20, 0x455A_14ED);
        a = gg(a, b, c, d, x[13], 5, 0xA9E3_E905);
        d = gg(d, a, b, c, x[2], 9, 0xFCEF_A3F8);
        c = gg(c, d, a, b, x[7], 14, 0x676F_02D9);
        b = gg(b, c, d, a, x[12], 20, 0x8D2A_4C8A);

        // Round 3
        a = hh(a, b, c, d, x[5], 4, 0xFFFA_3942);
        d = hh(d, a, b, c, x[8], 11, 0x8771_F681);
        c = hh(c, d, a, b, x[11], 16, 0x6D9D_6122);
        b = hh(b, c, d, a, x[14], 23, 0xFDE5_380C);
        a = hh(a, b, c, d, x[1], 4, 0xA4BE_EA44);
        d = hh(d, a, b, c, x[4], 11, 0x4BDE_CFA9);
        c = hh(c, d, a, b, x[7], 16, 0xF6BB_4B60);
        b = hh(b, c, d, a, x[10], 23, 0xBEBF_BC70);
        a = hh(a, b, c, d, x[13], 4, 0x289B_7EC6);
        d = hh(d, a, b, c, x[0], 11, 0xEAA1_27FA);
        c = hh(c, d, a, b, x[3], 16, 0xD4EF_3085);
        b = hh(b, c, d, a, x[6], 23, 0x0488_1D05);
        a = hh(a, b, c, d, x[9], 4, 0xD9D4_D039);
        d = hh(d, a, b, c, x[12], 11, 0xE6DB_99E5);
        c = hh(c, d, a, b, x[15], 16, 0x1FA2_7CF8);
        b = hh(b, c, d, a, x[2], 23, 0xC4AC_5665);

        // Round 4
        a = ii(a, b, c, d, x[0], 6, 0xF429_2244);
        d = ii(d, a, b, c, x[7], 10, 0x432A_FF97);
        c = ii(c, d, a, b, x[14], 15, 0xAB94_23A7);
        b = ii(b, c, d, a, x[5], 21, 0xFC93_A039);
        a = ii(a, b, c, d, x[12], 6, 0x655B_59C3);
        d = ii(d, a, b, c, x[3], 10, 0x8F0C_CC92);
        c = ii(c, d, a, b, x[10], 15, 0xFFEF_F47D);
        b = ii(b, c, d, a, x[1], 21, 0x8584_5DD1);
        a = ii(a, b, c, d, x[8], 6, 0x6FA8_7E4F);
        d = ii(d, a, b, c, x[15], 10, 0xFE2C_E6E0);
        c = ii(c, d, a, b, x[6], 15, 0xA301_4314);
        b = ii(b, c, d, a, x[13], 21, 0x4E08_11A1);
        a = ii(a, b, c, d, x[4], 6, 0xF753_7E82);
        d = ii(d, a, b, c, x[11], 10, 0xBD3A_F235);
        c = ii(c, d, a, b, x[2], 15, 0x2AD7_D2BB);
        b = ii(b, c, d, a, x[9], 21, 0xEB86_D391);

        state[0] = state[0].wrapping_add(a);
        state[1] = state[1].wrapping_add(b);
        state[2] = state[2].wrapping_add(c);
        state[3] = state[3].wrapping_add(d);
    }
}

/// Serialize the state little-endian and render it as uppercase hex.
fn digest_hex(words: &[u32]) -> String {
    let mut state = INITIAL_STATE;
    transform(&mut state, words);

    let mut digest = [0u8; 16];
    for (i, word) in state.iter().enumerate() {
        LittleEndian::write_u32(&mut digest[i * 4..i * 4 + 4], *word);
    }
    hex::encode_upper(digest)
}

/// Compute the MD5F digest of a byte message.
pub fn compute(message: &[u8]) -> String {
    trace!("Computing MD5F digest of {} bytes", message.len());
    digest_hex(&pad_message(message))
}

/// Compute the MD5F digest via the single-allocation padding path.
///
/// Agrees with [`compute`] on every input.
pub fn compute_opt(message: &[u8]) -> String {
    trace!("Computing MD5F digest of {} bytes (preallocated path)", message.len());
    digest_hex(&pad_message_opt(message))
}

/// Compute the MD5F digest of a string's UTF-8 bytes.
pub fn compute_str(message: &str) -> String {
    compute(message.as_bytes())
}
