use std::fs::File;
use std::path::Path;
use std::sync::Arc;

use arrow::array::{ArrayRef, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use parquet::file::properties::WriterProperties;

use crate::error::ZonalError;
use crate::link_resolver::LinkZoneCache;
use crate::zones::ZoneId;

/// Returns the number of rows written.
pub(super) fn write_mapping_parquet(
    cache: &LinkZoneCache,
    path: impl AsRef<Path>,
) -> Result<usize, ZonalError> {
    let mut link_ids = Vec::with_capacity(cache.len());
    let mut zones = Vec::with_capacity(cache.len());
    for (link_id, zone) in cache.iter() {
        link_ids.push(link_id.as_str());
        zones.push(zone.map(ZoneId::as_str));
    }
    let rows = link_ids.len();

    let schema = Arc::new(Schema::new(vec![
        Field::new("link_id", DataType::Utf8, false),
        Field::new("zone", DataType::Utf8, true),
    ]));
    let arrays: Vec<ArrayRef> = vec![
        Arc::new(StringArray::from(link_ids)),
        Arc::new(StringArray::from(zones)),
    ];
    let batch = RecordBatch::try_new(schema.clone(), arrays)?;

    let file = File::create(path)?;
    let props = WriterProperties::builder().build();
    let mut writer = ArrowWriter::try_new(file, schema, Some(props))?;
    writer.write(&batch)?;
    writer.close()?;
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::LinkId;
    use arrow::array::Array;
    use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;

    #[test]
    fn parquet_mapping_keeps_nulls_for_unresolved_links() {
        let cache: LinkZoneCache = vec![
            (LinkId::from("L1"), Some(ZoneId::from("Z3"))),
            (LinkId::from("L2"), None),
        ]
        .into_iter()
        .collect();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("link2zone.parquet");

        assert_eq!(write_mapping_parquet(&cache, &path).unwrap(), 2);

        let file = File::open(&path).unwrap();
        let reader = ParquetRecordBatchReaderBuilder::try_new(file)
            .unwrap()
            .build()
            .unwrap();
        let batches: Vec<RecordBatch> = reader.map(|batch| batch.unwrap()).collect();
        assert_eq!(batches.len(), 1);
        let batch = &batches[0];

        let links = batch
            .column(0)
            .as_any()
            .downcast_ref::<StringArray>()
            .unwrap();
        let zones = batch
            .column(1)
            .as_any()
            .downcast_ref::<StringArray>()
            .unwrap();
        assert_eq!(links.value(0), "L1");
        assert_eq!(links.value(1), "L2");
        assert_eq!(zones.value(0), "Z3");
        assert!(zones.is_null(1));
        assert!(batch.schema().field(1).is_nullable());
    }
}
