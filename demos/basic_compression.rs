use rust_huffman::{CodecConfig, HuffmanCodec};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let dir = std::env::temp_dir();
    let sample_path = dir.join("sample.txt");
    let compressed_path = dir.join("sample.huff");
    let decompressed_path = dir.join("decompressed.txt");

    let sample_text = "Hello, world! This is a sample text for Huffman compression. \
                      The quick brown fox jumps over the lazy dog. \
                      Huffman encoding is a greedy algorithm that builds optimal prefix codes.";

    std::fs::write(&sample_path, sample_text)?;

    println!("Created sample file: {} bytes", sample_text.len());

    let codec = HuffmanCodec::new(CodecConfig::default().with_verify(true));

    let stats = codec.compress_file(&sample_path, &compressed_path)?;
    println!(
        "Compressed to: {} bytes ({:.1}% of original, {:.2} bits per byte)",
        stats.encoded_len,
        stats.ratio() * 100.0,
        stats.bits_per_symbol()
    );
    println!("{}", stats);

    codec.decompress_file(&compressed_path, &decompressed_path)?;

    let decompressed_text = std::fs::read_to_string(&decompressed_path)?;

    if sample_text == decompressed_text {
        println!("Decompression successful! Data matches exactly.");
    } else {
        println!("Decompression failed! Data mismatch.");
        return Err("Decompression verification failed".into());
    }

    std::fs::remove_file(&sample_path)?;
    std::fs::remove_file(&compressed_path)?;
    std::fs::remove_file(&decompressed_path)?;

    println!("Cleaned up temporary files");

    Ok(())
}
