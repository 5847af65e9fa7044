use std::fs;
use std::path::Path;

use anyhow::{anyhow, Context};
use itext_feed::parse_tess;
use itext_protocol::Corpus;
use rkyv::ser::{serializers::AllocSerializer, Serializer};
use rkyv::{AlignedVec, Deserialize};
use tracing::info;

pub const CORPUS_VERSION: u32 = 1;

/// Parses Tesserae XML files into one corpus, in argument order.
pub fn ingest<P: AsRef<Path>>(files: &[P]) -> anyhow::Result<Corpus> {
    let mut corpus = Corpus {
        version: CORPUS_VERSION,
        texts: Vec::with_capacity(files.len()),
    };

    for (i, file) in files.iter().enumerate() {
        let file = file.as_ref();
        info!("[{}/{}] {}", i + 1, files.len(), file.display());
        let xml = fs::read_to_string(file).with_context(|| format!("reading {}", file.display()))?;
        let text = parse_tess(&xml).with_context(|| format!("parsing {}", file.display()))?;
        corpus.texts.push(text);
    }

    Ok(corpus)
}

pub fn write_archive(corpus: &Corpus, output: &Path) -> anyhow::Result<()> {
    let mut serializer = AllocSerializer::<256>::default();
    serializer
        .serialize_value(corpus)
        .map_err(|e| anyhow!("failed to archive corpus: {:?}", e))?;
    let bytes = serializer.into_serializer().into_inner();

    fs::write(output, &bytes).with_context(|| format!("writing {}", output.display()))?;
    Ok(())
}

/// Reads and validates a corpus archive.
pub fn read_archive(path: &Path) -> anyhow::Result<Corpus> {
    let raw = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    let mut bytes = AlignedVec::with_capacity(raw.len());
    bytes.extend_from_slice(&raw);

    let archived = rkyv::check_archived_root::<Corpus>(&bytes)
        .map_err(|e| anyhow!("{} is not a valid corpus archive: {:?}", path.display(), e))?;
    let corpus: Corpus = archived.deserialize(&mut rkyv::Infallible)?;
    info!(version = corpus.version, texts = corpus.texts.len(), "loaded corpus");
    Ok(corpus)
}
