//! Archive backend for text2file.
//!
//! Every archive holds the content as a single member named by
//! [`GenerateOptions::member_name`] (default `content.txt`), with the same
//! trailing-newline policy as plain text. Validation reads every member to
//! the end, so checksum and truncation errors surface as invalid files.
//! Decompression stops at [`MAX_UNPACKED_BYTES`] per archive.

use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::{Compression, GzBuilder};
use std::io::{self, Cursor, Read, Write};
use tar::{EntryType, Header};
use text2file_spec::text::with_trailing_newline;
use text2file_spec::{Format, GenerateError, GenerateOptions, Verdict};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Most decompressed bytes read while validating one archive.
pub const MAX_UNPACKED_BYTES: u64 = 1024 * 1024 * 1024;

/// Reader that fails once more than `limit` bytes came through.
struct Capped<R> {
    inner: R,
    left: u64,
    limit: u64,
}

impl<R> Capped<R> {
    fn new(inner: R, limit: u64) -> Self {
        Self {
            inner,
            left: limit,
            limit,
        }
    }
}

impl<R: Read> Read for Capped<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.inner.read(buf)?;
        match self.left.checked_sub(n as u64) {
            Some(left) => {
                self.left = left;
                Ok(n)
            }
            None => Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("expands past the {} byte limit", self.limit),
            )),
        }
    }
}

/// Produce the bytes of an archive artifact.
pub fn generate(
    format: Format,
    content: &str,
    options: &GenerateOptions,
) -> Result<Vec<u8>, GenerateError> {
    let member = options.checked_member_name()?;
    let data = with_trailing_newline(content).into_bytes();
    let result = match format {
        Format::Zip => write_zip(member, &data),
        Format::Tar => write_tar(Vec::new(), member, &data, options.mtime),
        Format::TarGz => {
            let encoder = GzEncoder::new(Vec::new(), Compression::default());
            write_tar(encoder, member, &data, options.mtime).and_then(GzEncoder::finish)
        }
        Format::Gz => write_gz(member, &data, options.mtime),
        other => return Err(GenerateError::backend(other, "not handled by the archive backend")),
    };
    result.map_err(|e| GenerateError::backend(format, e))
}

fn write_zip(member: &str, data: &[u8]) -> io::Result<Vec<u8>> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .unix_permissions(0o644);
    zip.start_file(member, options)?;
    zip.write_all(data)?;
    Ok(zip.finish()?.into_inner())
}

fn write_tar<W: Write>(out: W, member: &str, data: &[u8], mtime: u64) -> io::Result<W> {
    let mut builder = tar::Builder::new(out);
    let mut header = Header::new_gnu();
    header.set_entry_type(EntryType::Regular);
    header.set_size(data.len() as u64);
    header.set_mode(0o644);
    header.set_mtime(mtime);
    builder.append_data(&mut header, member, data)?;
    builder.into_inner()
}

fn write_gz(member: &str, data: &[u8], mtime: u64) -> io::Result<Vec<u8>> {
    // The gzip header stores the base name only.
    let name = member.rsplit('/').next().unwrap_or(member);
    let mut encoder = GzBuilder::new()
        .filename(name)
        .mtime(u32::try_from(mtime).unwrap_or(0))
        .write(Vec::new(), Compression::default());
    encoder.write_all(data)?;
    encoder.finish()
}

/// Inspect the bytes of an archive file.
pub fn validate(format: Format, bytes: &[u8]) -> Verdict {
    validate_within(format, bytes, MAX_UNPACKED_BYTES)
}

fn validate_within(format: Format, bytes: &[u8], limit: u64) -> Verdict {
    let checked = match format {
        Format::Zip => check_zip(bytes, limit),
        Format::Tar => check_tar(bytes),
        Format::TarGz => check_gzip_magic(bytes)
            .and_then(|_| check_tar(Capped::new(GzDecoder::new(bytes), limit))),
        Format::Gz => check_gzip_magic(bytes).and_then(|_| check_gz(bytes, limit)),
        other => Err(format!("{} is not handled by the archive backend", other)),
    };
    match checked {
        Ok(detail) => Verdict::valid(detail),
        Err(reason) => Verdict::invalid(reason),
    }
}

fn members(count: usize) -> String {
    if count == 1 {
        "1 member".to_string()
    } else {
        format!("{} members", count)
    }
}

fn check_zip(bytes: &[u8], limit: u64) -> Result<String, String> {
    let mut archive =
        ZipArchive::new(Cursor::new(bytes)).map_err(|e| format!("not a zip archive: {}", e))?;
    let mut files = 0usize;
    let mut left = limit;
    for i in 0..archive.len() {
        let mut entry = archive
            .by_index(i)
            .map_err(|e| format!("member {}: {}", i, e))?;
        if !entry.is_file() {
            continue;
        }
        let name = entry.name().to_string();
        let mut capped = Capped {
            inner: &mut entry,
            left,
            limit,
        };
        io::copy(&mut capped, &mut io::sink()).map_err(|e| format!("member {}: {}", name, e))?;
        left = capped.left;
        files += 1;
    }
    if files == 0 {
        return Err("zip archive has no file members".to_string());
    }
    Ok(format!("zip, {}", members(files)))
}

fn check_tar<R: Read>(reader: R) -> Result<String, String> {
    let mut archive = tar::Archive::new(reader);
    let entries = archive
        .entries()
        .map_err(|e| format!("not a tar archive: {}", e))?;
    let mut count = 0usize;
    for entry in entries {
        let mut entry = entry.map_err(|e| format!("bad tar entry: {}", e))?;
        let name = entry
            .path()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|_| format!("#{}", count));
        io::copy(&mut entry, &mut io::sink()).map_err(|e| format!("member {}: {}", name, e))?;
        count += 1;
    }
    if count == 0 {
        return Err("tar archive has no members".to_string());
    }
    Ok(format!("tar, {}", members(count)))
}

fn check_gzip_magic(bytes: &[u8]) -> Result<(), String> {
    if bytes.starts_with(&GZIP_MAGIC) {
        Ok(())
    } else {
        Err("missing gzip magic bytes".to_string())
    }
}

fn check_gz(bytes: &[u8], limit: u64) -> Result<String, String> {
    let mut decoder = Capped::new(GzDecoder::new(bytes), limit);
    let size = io::copy(&mut decoder, &mut io::sink())
        .map_err(|e| format!("corrupt gzip stream: {}", e))?;
    let name = decoder
        .inner
        .header()
        .and_then(|h| h.filename())
        .map(|n| String::from_utf8_lossy(n).into_owned());
    Ok(match name {
        Some(name) => format!("gzip, {} ({} bytes)", name, size),
        None => format!("gzip, {} bytes", size),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const ARCHIVES: [Format; 4] = [Format::Zip, Format::Tar, Format::TarGz, Format::Gz];

    fn read_zip_member(bytes: &[u8], name: &str) -> String {
        let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
        let mut member = archive.by_name(name).unwrap();
        let mut text = String::new();
        member.read_to_string(&mut text).unwrap();
        text
    }

    #[test]
    fn every_archive_round_trips() {
        let options = GenerateOptions::default();
        for format in ARCHIVES {
            let bytes = generate(format, "packed", &options).unwrap();
            assert!(validate(format, &bytes).is_valid(), "{format}");
        }
    }

    #[test]
    fn zip_holds_the_named_member() {
        let options = GenerateOptions {
            member_name: "notes/readme.txt".to_string(),
            ..Default::default()
        };
        let bytes = generate(Format::Zip, "hello", &options).unwrap();
        assert_eq!(read_zip_member(&bytes, "notes/readme.txt"), "hello\n");
        assert_eq!(validate(Format::Zip, &bytes), Verdict::valid("zip, 1 member"));
    }

    #[test]
    fn tar_entries_carry_the_batch_mtime() {
        let options = GenerateOptions {
            mtime: 1_700_000_000,
            ..Default::default()
        };
        let bytes = generate(Format::TarGz, "x", &options).unwrap();
        let mut archive = tar::Archive::new(GzDecoder::new(&bytes[..]));
        let entry = archive.entries().unwrap().next().unwrap().unwrap();
        assert_eq!(entry.header().mtime().unwrap(), 1_700_000_000);
        assert_eq!(entry.path().unwrap().to_str(), Some("content.txt"));
        assert_eq!(entry.header().size().unwrap(), 2);
    }

    #[test]
    fn gz_header_names_the_member() {
        let bytes = generate(Format::Gz, "abc", &GenerateOptions::default()).unwrap();
        assert_eq!(
            validate(Format::Gz, &bytes),
            Verdict::valid("gzip, content.txt (4 bytes)")
        );
    }

    #[test]
    fn unsafe_member_names_are_rejected() {
        for name in ["", "../escape.txt", "/abs.txt", "a//b"] {
            let options = GenerateOptions {
                member_name: name.to_string(),
                ..Default::default()
            };
            assert!(
                matches!(generate(Format::Tar, "x", &options), Err(GenerateError::InvalidOption(_))),
                "{name:?}"
            );
        }
    }

    #[test]
    fn decompression_stops_at_the_limit() {
        let content = "a".repeat(64 * 1024);
        let options = GenerateOptions::default();
        for format in [Format::Zip, Format::TarGz, Format::Gz] {
            let bytes = generate(format, &content, &options).unwrap();
            assert!(bytes.len() < 4096, "{format} should compress well");
            match validate_within(format, &bytes, 4096) {
                Verdict::Invalid { reason } => assert!(reason.contains("4096 byte limit"), "{reason}"),
                other => panic!("{format}: expected invalid, got {other:?}"),
            }
            assert!(validate_within(format, &bytes, 1024 * 1024).is_valid(), "{format}");
        }
    }

    #[test]
    fn damaged_archives_are_invalid() {
        let options = GenerateOptions::default();
        for format in ARCHIVES {
            assert!(!validate(format, b"").is_valid(), "{format} empty");
            assert!(!validate(format, b"definitely not an archive").is_valid(), "{format}");
        }

        let gz = generate(Format::Gz, "some longer content to compress", &options).unwrap();
        assert!(!validate(Format::Gz, &gz[..gz.len() - 6]).is_valid());

        let tar = generate(Format::Tar, "x", &options).unwrap();
        assert!(!validate(Format::Tar, &tar[..600]).is_valid());

        let empty_tar = tar::Builder::new(Vec::new()).into_inner().unwrap();
        assert_eq!(
            validate(Format::Tar, &empty_tar),
            Verdict::invalid("tar archive has no members")
        );

        let zip = generate(Format::Zip, "x", &options).unwrap();
        assert!(!validate(Format::TarGz, &zip).is_valid());
    }
}
