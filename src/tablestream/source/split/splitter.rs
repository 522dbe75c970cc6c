//! Dynamic chunk splitting for parallel table reads.
//!
//! The splitter partitions a table's key range into non-overlapping chunks
//! without scanning the table, picking one of three strategies per table:
//!
//! - **evenly-sized**: arithmetic stride over a densely packed key range
//! - **sampling-sharded**: quantile boundaries over a 1-in-N column sample
//!   when the key range is sparse and the shard count is large
//! - **unevenly-sized**: server-computed boundaries for string keys, wide
//!   temporal keys, and pathological distributions
//!
//! A splitter instance is created per (table, configuration) pair, produces
//! its full split list in one pass on the enumerator task, and is then
//! discarded.

use crate::tablestream::source::split::chunk::{ChunkRange, SourceSplit};
use crate::tablestream::source::split::config::SplitConfig;
use crate::tablestream::source::split::dialect::SourceDialect;
use crate::tablestream::source::split::error::{SplitError, SplitResult};
use crate::tablestream::source::split::key::{KeyType, KeyValue};
use crate::tablestream::source::split::throttle;
use crate::tablestream::source::table::{SourceTable, TablePath};
use rust_decimal::{Decimal, RoundingStrategy};
use std::cmp::Ordering;

/// Splits one table into an ordered list of chunk-backed [`SourceSplit`]s
///
/// The dialect adapter is borrowed for the duration of the pass; connection
/// lifetime and affinity are the adapter's concern.
pub struct DynamicChunkSplitter<'a> {
    dialect: &'a dyn SourceDialect,
    config: SplitConfig,
}

impl<'a> DynamicChunkSplitter<'a> {
    /// Create a splitter, validating the configuration up front
    pub fn new(dialect: &'a dyn SourceDialect, config: SplitConfig) -> SplitResult<Self> {
        config.validate()?;
        Ok(Self { dialect, config })
    }

    /// Partition the table and compose one split per chunk
    ///
    /// Splits are emitted in ascending key order; split ids are assigned in
    /// emission order as `"{table_path}-{ordinal}"`.
    pub async fn generate_splits(
        &self,
        table: &SourceTable,
        key_name: &str,
        key_type: &KeyType,
    ) -> SplitResult<Vec<SourceSplit>> {
        let chunks = self
            .split_table_into_chunks(table, key_name, key_type)
            .await?;

        let mut splits = Vec::with_capacity(chunks.len());
        for (ordinal, chunk) in chunks.into_iter().enumerate() {
            let (start, end) = chunk.into_bounds();
            splits.push(SourceSplit {
                table_path: table.table_path.clone(),
                split_id: format!("{}-{}", table.table_path, ordinal),
                query: table.query.clone(),
                key_name: key_name.to_string(),
                key_type: key_type.clone(),
                start,
                end,
            });
        }
        Ok(splits)
    }

    async fn split_table_into_chunks(
        &self,
        table: &SourceTable,
        key_name: &str,
        key_type: &KeyType,
    ) -> SplitResult<Vec<ChunkRange>> {
        let table_path = &table.table_path;
        let (min, max) = self.dialect.query_min_max(table, key_name).await?;
        let (min, max) = match (min, max) {
            (Some(min), Some(max)) if min != max => (min, max),
            // empty table, or only one key value: full table scan as a chunk
            _ => return Ok(vec![ChunkRange::all()]),
        };

        log::info!(
            "Splitting table {} into chunks, split column: {}, min: {}, max: {}, chunk size: {}, \
             distribution factor upper: {}, distribution factor lower: {}, sample sharding threshold: {}",
            table_path,
            key_name,
            min,
            max,
            self.config.split_size,
            self.config.distribution_factor_upper,
            self.config.distribution_factor_lower,
            self.config.sample_sharding_threshold
        );

        if !key_type.is_evenly_splittable() {
            return self
                .split_unevenly_sized_chunks(table, key_name, &min, &max)
                .await;
        }

        let approximate_row_cnt = self.dialect.approximate_row_count(table).await?;
        let distribution_factor =
            Self::calculate_distribution_factor(table_path, &min, &max, approximate_row_cnt)?;

        let data_is_evenly_distributed = distribution_factor
            >= self.config.distribution_factor_lower
            && distribution_factor <= self.config.distribution_factor_upper;

        if data_is_evenly_distributed {
            // the minimum dynamic chunk size is at least 1
            let dynamic_chunk_size =
                ((distribution_factor * self.config.split_size as f64) as i64).max(1);
            return self.split_evenly_sized_chunks(
                table_path,
                &min,
                &max,
                approximate_row_cnt,
                dynamic_chunk_size,
            );
        }

        let shard_count = (approximate_row_cnt / self.config.split_size as i64).max(0) as usize;
        if shard_count > self.config.sample_sharding_threshold {
            // The sample must contain more points than there are shards, so
            // the sampling stride may not be coarser than the chunk size.
            let mut inverse_sampling_rate = self.config.inverse_sampling_rate;
            if inverse_sampling_rate > self.config.split_size {
                log::warn!(
                    "The inverse sampling rate is {}, which is greater than chunk size {}, so we set \
                     the inverse sampling rate to the chunk size",
                    inverse_sampling_rate,
                    self.config.split_size
                );
                inverse_sampling_rate = self.config.split_size;
            }
            log::info!(
                "Use sampling sharding for table {}, the sampling rate is {}",
                table_path,
                inverse_sampling_rate
            );
            let sample = self
                .dialect
                .sample_column(table, key_name, inverse_sampling_rate)
                .await?;
            log::info!(
                "Sample data from table {} end, the sample size is {}",
                table_path,
                sample.len()
            );
            return Self::shard_through_sampling(
                table_path,
                &sample,
                approximate_row_cnt,
                shard_count,
            );
        }
        self.split_unevenly_sized_chunks(table, key_name, &min, &max)
            .await
    }

    /// Compute `(max - min + 1) / row_count` as an upper bound on the mean
    /// inter-key gap, in exact decimal rounded up to 4 fractional digits
    fn calculate_distribution_factor(
        table_path: &TablePath,
        min: &KeyValue,
        max: &KeyValue,
        approximate_row_cnt: i64,
    ) -> SplitResult<f64> {
        if min.type_name() != max.type_name() {
            return Err(SplitError::key_type_mismatch(
                min.type_name(),
                max.type_name(),
            ));
        }
        if approximate_row_cnt == 0 {
            return Ok(f64::MAX);
        }
        let difference = max.minus(min)?;
        let sub_row_cnt = difference + Decimal::ONE;
        let distribution_factor = (sub_row_cnt / Decimal::from(approximate_row_cnt))
            .round_dp_with_strategy(4, RoundingStrategy::ToPositiveInfinity)
            .to_string()
            .parse::<f64>()
            .unwrap_or(f64::MAX);
        log::info!(
            "The distribution factor of table {} is {} according to the min split key {}, max split \
             key {} and approximate row count {}",
            table_path,
            distribution_factor,
            min,
            max,
            approximate_row_cnt
        );
        Ok(distribution_factor)
    }

    /// Chunk a densely packed key range with an arithmetic stride
    ///
    /// The first chunk is open below so rows at `col == min` match its
    /// `col <= end AND col != end` predicate; all middle chunks are half-open
    /// `[start, end)`. This asymmetry guarantees every row matches exactly
    /// one chunk predicate.
    fn split_evenly_sized_chunks(
        &self,
        table_path: &TablePath,
        min: &KeyValue,
        max: &KeyValue,
        approximate_row_cnt: i64,
        dynamic_chunk_size: i64,
    ) -> SplitResult<Vec<ChunkRange>> {
        log::info!(
            "Use evenly-sized chunk optimization for table {}, the approximate row count is {}, \
             the chunk size is {}, the dynamic chunk size is {}",
            table_path,
            approximate_row_cnt,
            self.config.split_size,
            dynamic_chunk_size
        );
        if approximate_row_cnt <= self.config.split_size as i64 {
            // no more than one chunk, return the full table as a chunk
            return Ok(vec![ChunkRange::all()]);
        }

        let mut splits = Vec::new();
        let mut chunk_start: Option<KeyValue> = None;
        let mut chunk_end = Self::advance(min, dynamic_chunk_size)?;
        while let Some(end) = chunk_end {
            if end.compare(max)? == Ordering::Greater {
                break;
            }
            chunk_end = Self::advance(&end, dynamic_chunk_size)?;
            splits.push(ChunkRange::of(chunk_start, Some(end.clone()))?);
            chunk_start = Some(end);
        }
        // the ending chunk absorbs the remainder
        splits.push(ChunkRange::of(chunk_start, None)?);
        Ok(splits)
    }

    /// Stride advance that folds domain overflow into loop termination
    fn advance(value: &KeyValue, stride: i64) -> SplitResult<Option<KeyValue>> {
        match value.plus(stride) {
            Ok(next) => Ok(Some(next)),
            Err(SplitError::Overflow { .. }) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Chunk a sparse key range along quantile boundaries of a column sample
    fn shard_through_sampling(
        table_path: &TablePath,
        sample: &[KeyValue],
        approximate_row_cnt: i64,
        shard_count: usize,
    ) -> SplitResult<Vec<ChunkRange>> {
        log::info!(
            "Use efficient sharding through sampling optimization for table {}, the approximate \
             row count is {}, the shard count is {}",
            table_path,
            approximate_row_cnt,
            shard_count
        );

        if shard_count == 0 || sample.is_empty() {
            return Ok(vec![ChunkRange::all()]);
        }

        let approx_sample_per_shard = sample.len() as f64 / shard_count as f64;
        let mut splits = Vec::new();
        if approx_sample_per_shard <= 1.0 {
            // Fewer sample points than shards: one chunk per sample point.
            splits.push(ChunkRange::of(None, Some(sample[0].clone()))?);
            for i in 0..sample.len() - 1 {
                splits.push(ChunkRange::of(
                    Some(sample[i].clone()),
                    Some(sample[i + 1].clone()),
                )?);
            }
            splits.push(ChunkRange::of(Some(sample[sample.len() - 1].clone()), None)?);
        } else {
            for i in 0..shard_count {
                let chunk_start = if i == 0 {
                    None
                } else {
                    Some(sample[(i as f64 * approx_sample_per_shard) as usize].clone())
                };
                let chunk_end = if i < shard_count - 1 {
                    Some(sample[((i + 1) as f64 * approx_sample_per_shard) as usize].clone())
                } else {
                    None
                };
                splits.push(ChunkRange::of(chunk_start, chunk_end)?);
            }
        }
        Ok(splits)
    }

    /// Chunk with server-computed boundaries, one round-trip per chunk
    async fn split_unevenly_sized_chunks(
        &self,
        table: &SourceTable,
        key_name: &str,
        min: &KeyValue,
        max: &KeyValue,
    ) -> SplitResult<Vec<ChunkRange>> {
        log::info!(
            "Use unevenly-sized chunks for table {}, the chunk size is {}",
            table.table_path,
            self.config.split_size
        );
        let mut splits = Vec::new();
        let mut chunk_start: Option<KeyValue> = None;
        let mut chunk_end = self.next_chunk_end(table, key_name, Some(min), max).await?;
        let mut count = 0;
        while let Some(end) = chunk_end {
            // we start from [null, min + chunk_size) and avoid [null, min)
            splits.push(ChunkRange::of(chunk_start, Some(end.clone()))?);
            throttle::pace_queries(count, &table.table_path).await;
            count += 1;
            chunk_start = Some(end);
            chunk_end = self
                .next_chunk_end(table, key_name, chunk_start.as_ref(), max)
                .await?;
        }
        // the ending chunk captures the tail
        splits.push(ChunkRange::of(chunk_start, None)?);
        Ok(splits)
    }

    /// Discover the next chunk boundary on the server
    ///
    /// A dialect whose window cannot exclude the boundary value may return
    /// `after` itself when the next `chunk_size` rows share one key; a
    /// follow-up `query_min` skips past the duplicates. A boundary at or
    /// beyond `max` (or no boundary at all) ends the pass.
    async fn next_chunk_end(
        &self,
        table: &SourceTable,
        key_name: &str,
        after: Option<&KeyValue>,
        max: &KeyValue,
    ) -> SplitResult<Option<KeyValue>> {
        let mut chunk_end = self
            .dialect
            .query_next_chunk_max(table, key_name, self.config.split_size, after)
            .await?;
        if chunk_end.as_ref() == after {
            if let Some(after) = after {
                chunk_end = self.dialect.query_min(table, key_name, after).await?;
            }
            if chunk_end.as_ref() == after {
                // still no progress: terminate rather than loop forever
                return Ok(None);
            }
        }
        match chunk_end {
            Some(end) if end.compare(max)? == Ordering::Less => Ok(Some(end)),
            _ => Ok(None),
        }
    }
}
