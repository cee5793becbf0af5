// Reference encoders for the round-trip tests.
//
// Greedy parsers with a naive match finder: they produce valid streams for
// each decoder, not good compression.

#![allow(dead_code)]

use retrolz::prince::{TABLE1, TABLE2, TABLE3};

// ---------------------------------------------------------------------------
// Data generators
// ---------------------------------------------------------------------------

/// Deterministic pseudo-random data with a small alphabet so matches occur.
pub fn gen_data(len: usize, seed: u64, alphabet: u8) -> Vec<u8> {
    let mut state = seed;
    (0..len)
        .map(|_| {
            state = state
                .wrapping_mul(6364136223846793005)
                .wrapping_add(1442695040888963407);
            ((state >> 33) % u64::from(alphabet.max(1))) as u8
        })
        .collect()
}

/// Longest earlier occurrence of `data[pos..]`, as `(distance, length)`.
/// Overlapping matches (distance < length) are allowed.
pub fn longest_match(data: &[u8], pos: usize, max_dist: usize, max_len: usize) -> (usize, usize) {
    let limit = max_len.min(data.len() - pos);
    let mut best = (0, 0);
    for d in 1..=max_dist.min(pos) {
        let mut l = 0;
        while l < limit && data[pos - d + l] == data[pos + l] {
            l += 1;
        }
        if l > best.1 {
            best = (d, l);
            if l == limit {
                break;
            }
        }
    }
    best
}

// ---------------------------------------------------------------------------
// Bit writers
// ---------------------------------------------------------------------------

/// MSB-first bit packer, zero padded.
#[derive(Default)]
pub struct MsbWriter {
    out: Vec<u8>,
    used: u32,
}

impl MsbWriter {
    pub fn bit(&mut self, b: bool) {
        if self.used % 8 == 0 {
            self.out.push(0);
        }
        if b {
            let last = self.out.len() - 1;
            self.out[last] |= 0x80 >> (self.used % 8);
        }
        self.used += 1;
    }

    pub fn bits(&mut self, value: u32, width: u32) {
        for i in (0..width).rev() {
            self.bit((value >> i) & 1 != 0);
        }
    }

    pub fn finish(self) -> Vec<u8> {
        self.out
    }
}

/// Control-word writer: reserves a little-endian word in the byte stream
/// exactly where the decoder will first need a flag from it.
pub struct FlagWriter {
    out: Vec<u8>,
    unit: usize,
    top_first: bool,
    slot: Option<usize>,
    used: usize,
}

impl FlagWriter {
    pub fn new(unit: usize, top_first: bool) -> Self {
        Self {
            out: Vec::new(),
            unit,
            top_first,
            slot: None,
            used: 0,
        }
    }

    pub fn bit(&mut self, b: bool) {
        let width = self.unit * 8;
        if self.slot.is_none() || self.used == width {
            self.slot = Some(self.out.len());
            self.out.extend(std::iter::repeat_n(0, self.unit));
            self.used = 0;
        }
        if b {
            let p = if self.top_first {
                width - 1 - self.used
            } else {
                self.used
            };
            let at = self.slot.unwrap_or_default() + p / 8;
            self.out[at] |= 1 << (p % 8);
        }
        self.used += 1;
    }

    pub fn bits(&mut self, value: u32, width: u32) {
        for i in (0..width).rev() {
            self.bit((value >> i) & 1 != 0);
        }
    }

    pub fn byte(&mut self, b: u8) {
        self.out.push(b);
    }

    pub fn u16_le(&mut self, w: u16) {
        self.out.extend_from_slice(&w.to_le_bytes());
    }

    pub fn finish(self) -> Vec<u8> {
        self.out
    }
}

// ---------------------------------------------------------------------------
// SCI LZS
// ---------------------------------------------------------------------------

pub fn lzs_encode(data: &[u8]) -> Vec<u8> {
    let mut w = MsbWriter::default();
    let mut i = 0;
    while i < data.len() {
        let (dist, len) = longest_match(data, i, 2047, 300);
        if len >= 2 {
            w.bit(true);
            if dist < 128 {
                w.bit(true);
                w.bits(dist as u32, 7);
            } else {
                w.bit(false);
                w.bits(dist as u32, 11);
            }
            lzs_length(&mut w, len);
            i += len;
        } else {
            w.bit(false);
            w.bits(u32::from(data[i]), 8);
            i += 1;
        }
    }
    w.bits(0b11, 2);
    w.bits(0, 7);
    w.finish()
}

fn lzs_length(w: &mut MsbWriter, len: usize) {
    match len {
        2..=4 => w.bits(len as u32 - 2, 2),
        5..=7 => {
            w.bits(0b11, 2);
            w.bits(len as u32 - 5, 2);
        }
        _ => {
            w.bits(0b1111, 4);
            let mut rest = len - 8;
            while rest >= 15 {
                w.bits(0xF, 4);
                rest -= 15;
            }
            w.bits(rest as u32, 4);
        }
    }
}

// ---------------------------------------------------------------------------
// Delphine CineUnpack
// ---------------------------------------------------------------------------

/// Encode `data` as a CineUnpack block (bit stream, footer and valid CRC).
pub fn cine_encode(data: &[u8]) -> Vec<u8> {
    // The decoder fills from the end, so parse the reversed data: a copy
    // with offset `d` becomes an ordinary back-reference of distance `d`.
    let rev: Vec<u8> = data.iter().rev().copied().collect();
    let mut bits = Vec::new();
    let mut pending: Vec<u8> = Vec::new();
    let mut i = 0;
    while i < rev.len() {
        let (dist, len) = longest_match(&rev, i, 4095, 256);
        if len >= 2 {
            cine_raw(&mut bits, &pending);
            pending.clear();
            cine_copy(&mut bits, dist, len);
            i += len;
        } else {
            pending.push(rev[i]);
            i += 1;
        }
    }
    cine_raw(&mut bits, &pending);
    cine_block(&bits, data.len() as u32)
}

fn push_bits(bits: &mut Vec<bool>, value: u32, width: u32) {
    for i in (0..width).rev() {
        bits.push((value >> i) & 1 != 0);
    }
}

fn cine_raw(bits: &mut Vec<bool>, bytes: &[u8]) {
    for chunk in bytes.chunks(264) {
        if chunk.len() >= 9 {
            push_bits(bits, 0b111, 3);
            push_bits(bits, chunk.len() as u32 - 9, 8);
        } else {
            push_bits(bits, 0b00, 2);
            push_bits(bits, chunk.len() as u32 - 1, 3);
        }
        for &b in chunk {
            push_bits(bits, u32::from(b), 8);
        }
    }
}

fn cine_copy(bits: &mut Vec<bool>, dist: usize, len: usize) {
    let d = dist as u32;
    match (len, dist) {
        (2, 0..=255) => {
            push_bits(bits, 0b01, 2);
            push_bits(bits, d, 8);
        }
        (3, 0..=511) => {
            push_bits(bits, 0b100, 3);
            push_bits(bits, d, 9);
        }
        (4, 0..=1023) => {
            push_bits(bits, 0b101, 3);
            push_bits(bits, d, 10);
        }
        _ => {
            push_bits(bits, 0b110, 3);
            push_bits(bits, len as u32 - 1, 8);
            push_bits(bits, d, 12);
        }
    }
}

/// Lay out `bits` (in read order) as a packed block with a valid CRC.
pub fn cine_block(bits: &[bool], unpacked_len: u32) -> Vec<u8> {
    let head = bits.len() % 32;
    let mut chunk = 1u32 << head;
    for (i, &b) in bits[..head].iter().enumerate() {
        chunk |= u32::from(b) << i;
    }
    let words: Vec<u32> = bits[head..]
        .chunks(32)
        .map(|w| {
            w.iter()
                .enumerate()
                .fold(0u32, |acc, (i, &b)| acc | (u32::from(b) << i))
        })
        .collect();
    let crc = words.iter().fold(chunk, |acc, w| acc ^ w);

    let mut out = Vec::new();
    for w in words.iter().rev() {
        out.extend_from_slice(&w.to_be_bytes());
    }
    out.extend_from_slice(&chunk.to_be_bytes());
    out.extend_from_slice(&crc.to_be_bytes());
    out.extend_from_slice(&unpacked_len.to_be_bytes());
    out
}

// ---------------------------------------------------------------------------
// Cryo HLZ
// ---------------------------------------------------------------------------

pub fn hlz_encode(data: &[u8]) -> Vec<u8> {
    let mut w = FlagWriter::new(4, true);
    let mut i = 0;
    while i < data.len() {
        let (dist, len) = longest_match(data, i, 0x2000, 257);
        if (2..=5).contains(&len) && dist <= 0x100 {
            w.bit(true);
            w.bit(false);
            w.bits(len as u32 - 2, 2);
            w.byte((0x100 - dist) as u8);
            i += len;
        } else if len >= 3 {
            let field = ((0x2000 - dist) as u16) << 3;
            w.bit(true);
            w.bit(true);
            if len <= 9 {
                w.u16_le(field | (len as u16 - 2));
            } else {
                w.u16_le(field);
                w.byte((len - 2) as u8);
            }
            i += len;
        } else {
            w.bit(false);
            w.byte(data[i]);
            i += 1;
        }
    }
    w.bit(true);
    w.bit(true);
    w.u16_le(0);
    w.byte(0);
    w.finish()
}

// ---------------------------------------------------------------------------
// Prince LZ
// ---------------------------------------------------------------------------

const PRINCE_MIN_MATCH: usize = 4;
const PRINCE_MAX_MATCH: usize = 2049;
const PRINCE_MAX_DIST: usize = 32416;

/// Encode for `prince::decompress(.., data.len())`.
///
/// A one-byte output is not representable: the decoder produces nothing
/// when `size < 2`. Matches never end one byte short of the end, since the
/// decoder stops before a trailing single literal.
pub fn prince_encode(data: &[u8]) -> Vec<u8> {
    assert!(data.len() != 1, "one-byte outputs cannot be encoded");
    let n = data.len();
    let mut w = FlagWriter::new(1, true);
    let mut lit_start = 0;
    let mut i = 0;
    while i < n {
        let (dist, mut len) = longest_match(data, i, PRINCE_MAX_DIST, PRINCE_MAX_MATCH);
        if len > 0 && i + len == n - 1 {
            len -= 1;
        }
        if len >= PRINCE_MIN_MATCH {
            prince_literals(&mut w, &data[lit_start..i]);
            encode_code(&mut w, &TABLE1, (len - 2) as u32);
            prince_distance(&mut w, dist);
            i += len;
            lit_start = i;
        } else {
            i += 1;
        }
    }
    if lit_start < n {
        prince_literals(&mut w, &data[lit_start..]);
    }
    w.finish()
}

fn prince_literals(w: &mut FlagWriter, lits: &[u8]) {
    let gated = lits.len().min(6);
    for &b in &lits[..gated] {
        w.bit(true);
        w.byte(b);
    }
    if gated < 6 {
        w.bit(false);
    } else {
        encode_code(w, &TABLE3, (lits.len() - 6) as u32);
        for &b in &lits[6..] {
            w.byte(b);
        }
    }
}

fn encode_code(w: &mut FlagWriter, table: &[(u16, u16)], value: u32) {
    let last = table.len() - 1;
    let row = (0..table.len())
        .find(|&k| value < u32::from(table[k].1) + (2u32 << k))
        .unwrap_or(last);
    for _ in 0..row {
        w.bit(true);
    }
    if row < last {
        w.bit(false);
    }
    w.bits(value - u32::from(table[row].1), row as u32 + 1);
}

fn prince_distance(w: &mut FlagWriter, dist: usize) {
    let v = (dist - 1) as u32;
    let (row, entry) = TABLE2
        .iter()
        .enumerate()
        .rev()
        .find(|(_, e)| *e >> 16 <= v)
        .map(|(r, e)| (r, *e))
        .unwrap_or((0, TABLE2[0]));
    let extra_bits = (entry as u16).leading_ones() + 1;
    w.bits(row as u32, 3);
    w.bits(v - (entry >> 16), extra_bits);
}

// ---------------------------------------------------------------------------
// SLWM
// ---------------------------------------------------------------------------

pub fn slwm_encode(data: &[u8]) -> Vec<u8> {
    let mut w = FlagWriter::new(2, false);
    let mut i = 0;
    while i < data.len() {
        let (dist, len) = longest_match(data, i, 0x1000, 257);
        if (2..=5).contains(&len) && dist <= 0x100 {
            w.bit(false);
            w.bit(false);
            w.bits(len as u32 - 2, 2);
            w.byte((0x100 - dist) as u8);
            i += len;
        } else if len >= 3 {
            let field = 0x1000 - dist;
            let nibble = if len <= 17 { len - 2 } else { 0 };
            w.bit(false);
            w.bit(true);
            w.byte((field & 0xFF) as u8);
            w.byte((((field >> 8) << 4) | nibble) as u8);
            if nibble == 0 {
                w.byte((len - 2) as u8);
            }
            i += len;
        } else {
            w.bit(true);
            w.byte(data[i]);
            i += 1;
        }
    }
    w.bit(false);
    w.bit(true);
    w.byte(0);
    w.byte(0);
    w.byte(0);
    w.finish()
}

// ---------------------------------------------------------------------------
// Run-length family
// ---------------------------------------------------------------------------

fn runs(data: &[u8]) -> Vec<(u8, usize)> {
    let mut out: Vec<(u8, usize)> = Vec::new();
    for &b in data {
        match out.last_mut() {
            Some((v, n)) if *v == b && *n < 256 => *n += 1,
            _ => out.push((b, 1)),
        }
    }
    out
}

pub fn runs_forward_encode(data: &[u8]) -> Vec<u8> {
    runs(data)
        .into_iter()
        .flat_map(|(v, n)| [(n - 1) as u8, v])
        .collect()
}

pub fn runs_reverse_encode(data: &[u8]) -> Vec<u8> {
    let rev: Vec<u8> = data.iter().rev().copied().collect();
    runs_forward_encode(&rev)
}

pub fn packbits_encode(data: &[u8]) -> Vec<u8> {
    let mut out = Vec::new();
    let mut literal: Vec<u8> = Vec::new();
    let flush = |out: &mut Vec<u8>, literal: &mut Vec<u8>| {
        for chunk in literal.chunks(128) {
            out.push((chunk.len() - 1) as u8);
            out.extend_from_slice(chunk);
        }
        literal.clear();
    };
    for (v, n) in runs(data) {
        if n >= 3 {
            flush(&mut out, &mut literal);
            let mut left = n;
            while left > 0 {
                let take = left.min(128);
                if take >= 2 {
                    out.push((257 - take) as u8);
                    out.push(v);
                } else {
                    out.extend_from_slice(&[0, v]);
                }
                left -= take;
            }
        } else {
            literal.extend(std::iter::repeat_n(v, n));
        }
    }
    flush(&mut out, &mut literal);
    out
}
