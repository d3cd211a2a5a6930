//! The staged codec pipeline: partition -> DCT -> quantize -> zig-zag ->
//! DPCM/RLE -> Huffman code -> interleave -> pack into entropy-coded bytes,
//! and its inverse.
//!
//! The original implementation threads an `EncodingResult` dataclass
//! through every stage with one `Optional` field per stage's output, valid
//! or not depending on how far the pipeline got (`util/encoding_result.py`,
//! `util/encoding_stages.py`). That shape doesn't type-check the way a
//! Rust caller would want: nothing stops you from reading a `None` field
//! for a stage you never ran. Here each stage's result is its own struct
//! that *contains* the previous stage's, so `PipelineResult` is a genuine
//! tagged sum: the variant you hold is exactly the data that stage
//! produced, plus everything it took to get there, and nothing else.

use crate::block::{self, Block};
use crate::bitstream::BitWriter;
use crate::dct;
use crate::dpcm;
use crate::errors::{JpegError, JpegResult};
use crate::huffman::HuffmanTable;
use crate::quant;
use crate::rle::{self, AcSymbol};
use crate::tables::{STD_CHROMINANCE_QUANT_TABLE, STD_LUMINANCE_QUANT_TABLE};
use crate::zigzag;

/// Three planes, one per component, always in `[Y, Cb, Cr]` order (this
/// codec has no subsampling, so every component shares one block grid).
pub type Triple<T> = [T; 3];

/// The furthest stage a [`PipelineResult`] carries data for.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Stage {
    Mcus,
    Dct,
    Quant,
    Zigzag,
    Dpcm,
    Rle,
    Dc,
    Ac,
    Interleaver,
    Jpeg
}

pub struct McusData {
    pub width: u16,
    pub height: u16,
    pub blocks: Triple<Vec<Block>>
}

pub struct DctData {
    pub mcus: McusData,
    pub coeffs: Triple<Vec<[[f64; 8]; 8]>>
}

pub struct QuantData {
    pub dct: DctData,
    pub levels: Triple<Vec<[[i32; 8]; 8]>>
}

pub struct ZigzagData {
    pub quant: QuantData,
    pub sequences: Triple<Vec<[i32; 64]>>
}

pub struct DpcmData {
    pub zigzag: ZigzagData,
    pub dc_diffs: Triple<Vec<i32>>
}

pub struct RleData {
    pub dpcm: DpcmData,
    pub ac_symbols: Triple<Vec<Vec<AcSymbol>>>
}

/// A symbol's Huffman code paired with its value's magnitude bits: `(huff
/// code, huff length, magnitude bits, magnitude length)`.
pub type CodedValue = (u16, u8, u16, u8);

pub struct DcData {
    pub rle: RleData,
    pub coded_dc: Triple<Vec<CodedValue>>
}

/// An AC symbol's Huffman code paired with the run/category/value it
/// encodes, kept together (rather than flattened like [`CodedValue`]) since
/// the run length has to survive for a decode that resumes from this stage
/// without a bitstream to re-derive it from.
pub type CodedAc = (u16, u8, AcSymbol);

pub struct AcData {
    pub dc: DcData,
    pub coded_ac: Triple<Vec<Vec<CodedAc>>>
}

pub struct InterleaverData {
    pub ac: AcData,
    /// Every `(bits, length)` pair the scan emits, in MCU order: for each
    /// block, the DC huffman code, DC magnitude bits, then each AC symbol's
    /// huffman code and (if any) magnitude bits.
    pub interleaved: Vec<(u16, u8)>
}

pub struct JpegData {
    pub interleaver: InterleaverData,
    /// Byte-stuffed entropy-coded scan data, ready to be wrapped in marker
    /// segments by the encoder.
    pub bytes: Vec<u8>
}

pub enum PipelineResult {
    Mcus(McusData),
    Dct(DctData),
    Quant(QuantData),
    Zigzag(ZigzagData),
    Dpcm(DpcmData),
    Rle(RleData),
    Dc(DcData),
    Ac(AcData),
    Interleaver(InterleaverData),
    Jpeg(JpegData)
}

impl PipelineResult {
    #[must_use]
    pub fn stage(&self) -> Stage {
        match self {
            PipelineResult::Mcus(_) => Stage::Mcus,
            PipelineResult::Dct(_) => Stage::Dct,
            PipelineResult::Quant(_) => Stage::Quant,
            PipelineResult::Zigzag(_) => Stage::Zigzag,
            PipelineResult::Dpcm(_) => Stage::Dpcm,
            PipelineResult::Rle(_) => Stage::Rle,
            PipelineResult::Dc(_) => Stage::Dc,
            PipelineResult::Ac(_) => Stage::Ac,
            PipelineResult::Interleaver(_) => Stage::Interleaver,
            PipelineResult::Jpeg(_) => Stage::Jpeg
        }
    }
}

fn quant_table(component: usize) -> &'static [u16; 64] {
    if component == 0 {
        &STD_LUMINANCE_QUANT_TABLE
    } else {
        &STD_CHROMINANCE_QUANT_TABLE
    }
}

/// The four standard Huffman tables used throughout a scan: luminance and
/// chrominance, DC and AC.
pub struct HuffmanTables {
    pub dc: [HuffmanTable; 2],
    pub ac: [HuffmanTable; 2]
}

impl HuffmanTables {
    fn dc_for(&self, table_id: usize) -> &HuffmanTable {
        if table_id == 0 { &self.dc[0] } else { &self.dc[1] }
    }

    fn ac_for(&self, table_id: usize) -> &HuffmanTable {
        if table_id == 0 { &self.ac[0] } else { &self.ac[1] }
    }
}

/// Which Huffman table (0 or 1, indexing [`HuffmanTables`]) each of the
/// three components (Y, Cb, Cr) uses for DC and AC symbols, as declared by
/// the SOS segment's per-component table selectors. The encoder always
/// assigns `[(0, 0), (1, 1), (1, 1)]`, but a decoder must honour whatever a
/// file's own SOS header actually says rather than assume that layout.
pub type ComponentTableIds = Triple<(u8, u8)>;

const STANDARD_TABLE_IDS: ComponentTableIds = [(0, 0), (1, 1), (1, 1)];

/// Run the pipeline forward from Y/Cb/Cr planes to `stop_at`, inclusive.
pub fn encode(
    y: &[u8],
    cb: &[u8],
    cr: &[u8],
    width: u16,
    height: u16,
    huffman: &HuffmanTables,
    stop_at: Stage
) -> JpegResult<PipelineResult> {
    log::debug!("partitioning {width}x{height} planes into 8x8 blocks");
    let (w, h) = (usize::from(width), usize::from(height));
    let blocks = [block::partition(y, w, h)?, block::partition(cb, w, h)?, block::partition(cr, w, h)?];
    let mcus = McusData { width, height, blocks };
    if stop_at == Stage::Mcus {
        return Ok(PipelineResult::Mcus(mcus));
    }

    log::debug!("running the forward DCT");
    let coeffs = each_component(&mcus.blocks, |blocks| blocks.iter().map(dct::forward).collect());
    let dct_data = DctData { mcus, coeffs };
    if stop_at == Stage::Dct {
        return Ok(PipelineResult::Dct(dct_data));
    }

    log::debug!("quantizing coefficients");
    let levels = each_component_indexed(&dct_data.coeffs, |i, coeffs| {
        coeffs.iter().map(|c| quant::quantize(c, quant_table(i))).collect()
    });
    let quant_data = QuantData { dct: dct_data, levels };
    if stop_at == Stage::Quant {
        return Ok(PipelineResult::Quant(quant_data));
    }

    log::debug!("reordering coefficients into zig-zag sequence");
    let sequences = each_component(&quant_data.levels, |levels| levels.iter().map(zigzag::to_zigzag).collect());
    let zigzag_data = ZigzagData { quant: quant_data, sequences };
    if stop_at == Stage::Zigzag {
        return Ok(PipelineResult::Zigzag(zigzag_data));
    }

    log::debug!("differencing DC terms");
    let dc_diffs = each_component(&zigzag_data.sequences, |sequences| {
        dpcm::encode_diffs(&sequences.iter().map(|s| s[0]).collect::<Vec<_>>())
    });
    let dpcm_data = DpcmData { zigzag: zigzag_data, dc_diffs };
    if stop_at == Stage::Dpcm {
        return Ok(PipelineResult::Dpcm(dpcm_data));
    }

    log::debug!("run-length encoding AC terms");
    let ac_symbols = each_component(&dpcm_data.zigzag.sequences, |sequences| {
        sequences
            .iter()
            .map(|s| {
                let ac: [i32; 63] = core::array::from_fn(|i| s[i + 1]);
                rle::encode_ac(&ac)
            })
            .collect()
    });
    let rle_data = RleData { dpcm: dpcm_data, ac_symbols };
    if stop_at == Stage::Rle {
        return Ok(PipelineResult::Rle(rle_data));
    }

    log::debug!("huffman coding DC terms");
    let mut coded_dc: Triple<Vec<CodedValue>> = [Vec::new(), Vec::new(), Vec::new()];
    for component in 0..3 {
        let (dc_id, _ac_id) = STANDARD_TABLE_IDS[component];
        for &diff in &rle_data.dpcm.dc_diffs[component] {
            let (category, bits) = dpcm::encode_magnitude(diff);
            let (code, length) = huffman.dc_for(usize::from(dc_id)).encode(category)?;
            coded_dc[component].push((code, length, bits, category));
        }
    }
    let dc_data = DcData { rle: rle_data, coded_dc };
    if stop_at == Stage::Dc {
        return Ok(PipelineResult::Dc(dc_data));
    }

    let mut coded_ac: Triple<Vec<Vec<CodedAc>>> = [Vec::new(), Vec::new(), Vec::new()];
    for component in 0..3 {
        let (_dc_id, ac_id) = STANDARD_TABLE_IDS[component];
        for symbols in &dc_data.rle.ac_symbols[component] {
            let mut coded_block = Vec::with_capacity(symbols.len());
            for &symbol in symbols {
                let (code, length) = huffman.ac_for(usize::from(ac_id)).encode(symbol.huffman_byte())?;
                coded_block.push((code, length, symbol));
            }
            coded_ac[component].push(coded_block);
        }
    }
    let ac_data = AcData { dc: dc_data, coded_ac };
    if stop_at == Stage::Ac {
        return Ok(PipelineResult::Ac(ac_data));
    }

    let block_count = ac_data.dc.rle.dpcm.zigzag.quant.dct.mcus.blocks[0].len();
    let mut interleaved = Vec::new();
    for block_idx in 0..block_count {
        for component in 0..3 {
            let (dc_code, dc_len, dc_bits, dc_bit_len) = ac_data.dc.coded_dc[component][block_idx];
            interleaved.push((dc_code, dc_len));
            if dc_bit_len > 0 {
                interleaved.push((dc_bits, dc_bit_len));
            }
            for &(ac_code, ac_len, symbol) in &ac_data.coded_ac[component][block_idx] {
                interleaved.push((ac_code, ac_len));
                if symbol.category > 0 {
                    interleaved.push((symbol.bits, symbol.category));
                }
            }
        }
    }
    let interleaver_data = InterleaverData { ac: ac_data, interleaved };
    if stop_at == Stage::Interleaver {
        return Ok(PipelineResult::Interleaver(interleaver_data));
    }

    let mut writer = BitWriter::new();
    for &(value, length) in &interleaver_data.interleaved {
        writer.write_bits(value, length);
    }
    let bytes = writer.finish();
    Ok(PipelineResult::Jpeg(JpegData { interleaver: interleaver_data, bytes }))
}

fn each_component<T, F: Fn(&Vec<Block>) -> T>(blocks: &Triple<Vec<Block>>, f: F) -> Triple<T> {
    [f(&blocks[0]), f(&blocks[1]), f(&blocks[2])]
}

fn each_component_indexed<S, T, F: Fn(usize, &S) -> T>(input: &Triple<S>, f: F) -> Triple<T> {
    [f(0, &input[0]), f(1, &input[1]), f(2, &input[2])]
}

/// Run the pipeline backward from `result` (whose own stage must equal
/// `resume_from`) down to Y/Cb/Cr planes.
pub fn decode(
    result: PipelineResult,
    resume_from: Stage,
    huffman: &HuffmanTables,
    width: u16,
    height: u16
) -> JpegResult<(Vec<u8>, Vec<u8>, Vec<u8>)> {
    if result.stage() != resume_from {
        return Err(JpegError::StageInputMissing(format!(
            "asked to resume from {resume_from:?} but the supplied result is at {:?}",
            result.stage()
        )));
    }

    let mcus = match result {
        PipelineResult::Jpeg(jpeg) => {
            let mut reader = crate::bitstream::BitReader::new(&jpeg.bytes);
            let quant_tables = [
                *quant_table(0), *quant_table(1), *quant_table(1)
            ];
            decode_from_bitstream(&mut reader, huffman, &STANDARD_TABLE_IDS, &quant_tables, width, height)?
        }
        PipelineResult::Interleaver(data) => decode_from_ac(data.ac),
        PipelineResult::Ac(data) => decode_from_ac(data),
        PipelineResult::Dc(data) => decode_from_rle(data.rle),
        PipelineResult::Rle(data) => decode_from_rle(data),
        PipelineResult::Dpcm(data) => decode_from_zigzag(data.zigzag),
        PipelineResult::Zigzag(data) => decode_from_quant(data.quant),
        PipelineResult::Quant(data) => decode_from_dct(data.dct),
        PipelineResult::Dct(data) => decode_from_mcus(data.mcus),
        PipelineResult::Mcus(data) => data
    };

    let w = usize::from(mcus.width);
    let h = usize::from(mcus.height);
    Ok((
        block::unpartition(&mcus.blocks[0], w, h)?,
        block::unpartition(&mcus.blocks[1], w, h)?,
        block::unpartition(&mcus.blocks[2], w, h)?
    ))
}

/// Decode destuffed, entropy-coded scan bytes straight from a parsed
/// bitstream (no prior in-memory `PipelineResult` to resume from, unlike
/// [`decode`]). `table_ids` is the per-component `(dc, ac)` Huffman table
/// selector pair the SOS segment actually declared for each of Y, Cb, Cr, in
/// that order; the decoder must honour these rather than assume the
/// encoder's own `[(0,0),(1,1),(1,1)]` layout. `quant_tables` is likewise
/// the *actual* zig-zag-inverted table bytes each component's DQT segment
/// carried: a decoder dequantizes against whatever the file says, even a
/// corrupted table, rather than silently substituting the standard one
/// (spec: DQT corruption must still decode, just with added error).
pub fn decode_bytes(
    scan_bytes: &[u8],
    huffman: &HuffmanTables,
    table_ids: &ComponentTableIds,
    quant_tables: &Triple<[u16; 64]>,
    width: u16,
    height: u16
) -> JpegResult<(Vec<u8>, Vec<u8>, Vec<u8>)> {
    let mut reader = crate::bitstream::BitReader::new(scan_bytes);
    let mcus = decode_from_bitstream(&mut reader, huffman, table_ids, quant_tables, width, height)?;
    let w = usize::from(width);
    let h = usize::from(height);
    Ok((
        block::unpartition(&mcus.blocks[0], w, h)?,
        block::unpartition(&mcus.blocks[1], w, h)?,
        block::unpartition(&mcus.blocks[2], w, h)?
    ))
}

fn decode_from_mcus(mcus: McusData) -> McusData {
    mcus
}

fn decode_from_dct(dct: DctData) -> McusData {
    let blocks = each_component_indexed(&dct.coeffs, |_, coeffs| {
        coeffs.iter().map(dct::inverse).collect::<Vec<_>>()
    });
    McusData { width: dct.mcus.width, height: dct.mcus.height, blocks }
}

fn decode_from_quant(quant: QuantData) -> McusData {
    let coeffs = each_component_indexed(&quant.levels, |i, levels| {
        levels.iter().map(|l| quant::dequantize(l, quant_table(i))).collect::<Vec<_>>()
    });
    decode_from_dct(DctData { mcus: quant.dct.mcus, coeffs })
}

fn decode_from_zigzag(zigzag: ZigzagData) -> McusData {
    let levels = each_component(&zigzag.sequences, |sequences| {
        sequences.iter().map(zigzag::from_zigzag).collect::<Vec<_>>()
    });
    decode_from_quant(QuantData { dct: zigzag.quant.dct, levels })
}

fn rebuild_sequences(dc_values: &[i32], ac: &[[i32; 63]]) -> Vec<[i32; 64]> {
    dc_values
        .iter()
        .zip(ac)
        .map(|(&dc, ac_block)| {
            let mut seq = [0i32; 64];
            seq[0] = dc;
            seq[1..].copy_from_slice(ac_block);
            seq
        })
        .collect()
}

fn decode_from_rle(rle: RleData) -> McusData {
    let dc_values = each_component(&rle.dpcm.dc_diffs, |diffs| dpcm::decode_diffs(diffs));
    let ac_blocks = each_component(&rle.ac_symbols, |blocks| {
        blocks.iter().map(|symbols| rle::decode_ac(symbols)).collect::<Vec<_>>()
    });
    let sequences = each_component_indexed(&dc_values, |i, dc| rebuild_sequences(dc, &ac_blocks[i]));
    decode_from_zigzag(ZigzagData { quant: rle.dpcm.zigzag.quant, sequences })
}

fn decode_from_ac(ac: AcData) -> McusData {
    let dc_diffs = each_component(&ac.dc.coded_dc, |coded| {
        coded.iter().map(|&(_, _, bits, category)| dpcm::decode_magnitude(category, bits)).collect::<Vec<_>>()
    });
    let ac_symbols = each_component(&ac.coded_ac, |blocks| {
        blocks
            .iter()
            .map(|symbols| symbols.iter().map(|&(_code, _len, symbol)| symbol).collect())
            .collect()
    });
    decode_from_rle(RleData {
        dpcm: DpcmData { zigzag: ac.dc.rle.dpcm.zigzag, dc_diffs },
        ac_symbols
    })
}

fn decode_from_bitstream(
    reader: &mut crate::bitstream::BitReader,
    huffman: &HuffmanTables,
    table_ids: &ComponentTableIds,
    quant_tables: &Triple<[u16; 64]>,
    width: u16,
    height: u16
) -> JpegResult<McusData> {
    let (padded_w, padded_h) = block::padded_dims(usize::from(width), usize::from(height));
    let block_count = (padded_w / block::BLOCK_SIZE) * (padded_h / block::BLOCK_SIZE);

    let mut dc_diffs: Triple<Vec<i32>> = [Vec::new(), Vec::new(), Vec::new()];
    let mut ac_symbols: Triple<Vec<Vec<AcSymbol>>> = [Vec::new(), Vec::new(), Vec::new()];

    for _ in 0..block_count {
        for component in 0..3usize {
            let (dc_id, ac_id) = table_ids[component];
            let category = decode_huffman_symbol(reader, huffman.dc_for(usize::from(dc_id)))?;
            let bits = reader.read_bits(category)?;
            dc_diffs[component].push(dpcm::decode_magnitude(category, bits));

            let mut symbols = Vec::new();
            loop {
                let byte = decode_huffman_symbol(reader, huffman.ac_for(usize::from(ac_id)))?;
                let run = byte >> 4;
                let size = byte & 0x0F;
                let bits = reader.read_bits(size)?;
                let symbol = AcSymbol { run, category: size, bits };
                let done = symbol.is_eob();
                symbols.push(symbol);
                if done || symbols.iter().map(|s| if s.is_zrl() { 16 } else { 1 + usize::from(s.run) }).sum::<usize>() >= 63 {
                    break;
                }
            }
            ac_symbols[component].push(symbols);
        }
    }

    let dc_values = each_component(&dc_diffs, |diffs| dpcm::decode_diffs(diffs));
    let sequences = each_component_indexed(&dc_values, |i, dc| {
        let ac: Vec<[i32; 63]> = ac_symbols[i].iter().map(|s| rle::decode_ac(s)).collect();
        rebuild_sequences(dc, &ac)
    });
    let levels = each_component(&sequences, |sequences| sequences.iter().map(zigzag::from_zigzag).collect());
    let coeffs = each_component_indexed(&levels, |i, levels| {
        levels.iter().map(|l| quant::dequantize(l, &quant_tables[i])).collect::<Vec<_>>()
    });
    let blocks = each_component(&coeffs, |coeffs| coeffs.iter().map(dct::inverse).collect());
    Ok(McusData { width, height, blocks })
}

fn decode_huffman_symbol(reader: &mut crate::bitstream::BitReader, table: &HuffmanTable) -> JpegResult<u8> {
    let peek8 = reader.peek_bits(8) as u8;
    let mut extra = 0u8;
    let (symbol, length) = table.decode(peek8, || {
        extra += 1;
        Ok((reader.peek_bits(8 + extra) & 1) as u8)
    })?;
    reader.consume_bits(length);
    Ok(symbol)
}
