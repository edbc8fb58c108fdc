//! The topic level log config schema.
//!
//! These are the per-topic overrides which brokers apply to the log of a topic.

use lazy_static::lazy_static;

use super::{ConfigSchema, Validator, BOOLEAN, DOUBLE_0_1, INT_1_OR_MORE, INT_NOT_NEGATIVE, LONG, LONG_NOT_NEGATIVE};

pub const SEGMENT_BYTES: &str = "segment.bytes";
pub const SEGMENT_MS: &str = "segment.ms";
pub const SEGMENT_JITTER_MS: &str = "segment.jitter.ms";
pub const SEGMENT_INDEX_BYTES: &str = "segment.index.bytes";
pub const FLUSH_MESSAGES: &str = "flush.messages";
pub const FLUSH_MS: &str = "flush.ms";
pub const RETENTION_BYTES: &str = "retention.bytes";
pub const RETENTION_MS: &str = "retention.ms";
pub const MAX_MESSAGE_BYTES: &str = "max.message.bytes";
pub const INDEX_INTERVAL_BYTES: &str = "index.interval.bytes";
pub const DELETE_RETENTION_MS: &str = "delete.retention.ms";
pub const FILE_DELETE_DELAY_MS: &str = "file.delete.delay.ms";
pub const MIN_CLEANABLE_DIRTY_RATIO: &str = "min.cleanable.dirty.ratio";
pub const CLEANUP_POLICY: &str = "cleanup.policy";
pub const UNCLEAN_LEADER_ELECTION_ENABLE: &str = "unclean.leader.election.enable";
pub const MIN_INSYNC_REPLICAS: &str = "min.insync.replicas";
pub const COMPRESSION_TYPE: &str = "compression.type";
pub const PREALLOCATE: &str = "preallocate";
pub const MESSAGE_FORMAT_VERSION: &str = "message.format.version";
pub const MESSAGE_TIMESTAMP_TYPE: &str = "message.timestamp.type";
pub const MESSAGE_TIMESTAMP_DIFFERENCE_MAX_MS: &str = "message.timestamp.difference.max.ms";

const SEGMENT_BYTES_DOC: &str = "This configuration controls the segment file size for the log. Retention and cleaning is always done a file at a time so a larger segment size means fewer files but less granular control over retention.";
const SEGMENT_MS_DOC: &str = "This configuration controls the period of time after which the broker will force the log to roll even if the segment file isn't full to ensure that retention can delete or compact old data.";
const SEGMENT_JITTER_MS_DOC: &str = "The maximum random jitter subtracted from the scheduled segment roll time to avoid thundering herds of segment rolling.";
const SEGMENT_INDEX_BYTES_DOC: &str = "This configuration controls the size of the index that maps offsets to file positions. The index file is preallocated and shrunk only after log rolls. You generally should not need to change this setting.";
const FLUSH_MESSAGES_DOC: &str = "This setting allows specifying an interval at which an fsync of data written to the log will be forced. For example if this was set to 1 the broker would fsync after every message; if it were 5 it would fsync after every five messages. In general it is recommended to leave this unset and use replication for durability.";
const FLUSH_MS_DOC: &str = "This setting allows specifying a time interval at which an fsync of data written to the log will be forced. For example if this was set to 1000 the broker would fsync after 1000 ms had passed. In general it is recommended to leave this unset and use replication for durability.";
const RETENTION_BYTES_DOC: &str = "This configuration controls the maximum size a log can grow to before old log segments are discarded to free up space if the \"delete\" retention policy is in use. By default there is no size limit only a time limit.";
const RETENTION_MS_DOC: &str = "This configuration controls the maximum time a log is retained before old log segments are discarded to free up space if the \"delete\" retention policy is in use. This represents an SLA on how soon consumers must read their data.";
const MAX_MESSAGE_BYTES_DOC: &str = "This is the largest message size the broker will allow to be appended. If this is increased, consumer fetch sizes must be increased as well so they can fetch messages this large.";
const INDEX_INTERVAL_BYTES_DOC: &str = "This setting controls how frequently the broker adds an index entry to its offset index. More indexing allows reads to jump closer to the exact position in the log but makes the index larger.";
const DELETE_RETENTION_MS_DOC: &str = "The amount of time to retain delete tombstone markers for log compacted topics. This setting also gives a bound on the time in which a consumer must complete a read if they begin from offset 0 to ensure that they get a valid snapshot of the final stage.";
const FILE_DELETE_DELAY_MS_DOC: &str = "The time to wait before deleting a file from the filesystem.";
const MIN_CLEANABLE_DIRTY_RATIO_DOC: &str = "This configuration controls how frequently the log compactor will attempt to clean the log (assuming log compaction is enabled). A higher ratio will mean fewer, more efficient cleanings but will mean more wasted space in the log.";
const CLEANUP_POLICY_DOC: &str = "A string that is either \"delete\" or \"compact\". This string designates the retention policy to use on old log segments. The default policy (\"delete\") will discard old segments when their retention time or size limit has been reached. The \"compact\" setting will enable log compaction on the topic.";
const UNCLEAN_LEADER_ELECTION_ENABLE_DOC: &str = "Indicates whether to enable replicas not in the ISR set to be elected as leader as a last resort, even though doing so may result in data loss.";
const MIN_INSYNC_REPLICAS_DOC: &str = "When a producer sets acks to \"all\" (or \"-1\"), min.insync.replicas specifies the minimum number of replicas that must acknowledge a write for the write to be considered successful. If this minimum cannot be met, then the producer will raise an exception (either NotEnoughReplicas or NotEnoughReplicasAfterAppend).";
const COMPRESSION_TYPE_DOC: &str = "Specify the final compression type for a given topic. This configuration accepts the standard compression codecs ('gzip', 'snappy', 'lz4'). It additionally accepts 'uncompressed' which is equivalent to no compression; and 'producer' which means retain the original compression codec set by the producer.";
const PREALLOCATE_DOC: &str = "Should the broker preallocate the file when creating a new segment?";
const MESSAGE_FORMAT_VERSION_DOC: &str = "Specify the message format version the broker will use to append messages to the logs. The value should be a valid ApiVersion, for example 0.8.2, 0.9.0 or 0.10.0. Setting this value incorrectly will cause consumers with older versions to break as they will receive messages with a format that they don't understand.";
const MESSAGE_TIMESTAMP_TYPE_DOC: &str = "Define whether the timestamp in the message is message create time or log append time. The value should be either `CreateTime` or `LogAppendTime`.";
const MESSAGE_TIMESTAMP_DIFFERENCE_MAX_MS_DOC: &str = "The maximum difference allowed between the timestamp when a broker receives a message and the timestamp specified in the message. If message.timestamp.type=CreateTime, a message will be rejected if the difference in timestamp exceeds this threshold. This configuration is ignored if message.timestamp.type=LogAppendTime.";

lazy_static! {
    /// The schema of all per-topic log config overrides.
    pub static ref TOPIC_CONFIG: ConfigSchema = ConfigSchema::new()
        .define(SEGMENT_BYTES, INT_NOT_NEGATIVE.clone(), SEGMENT_BYTES_DOC)
        .define(SEGMENT_MS, LONG_NOT_NEGATIVE.clone(), SEGMENT_MS_DOC)
        .define(SEGMENT_JITTER_MS, LONG_NOT_NEGATIVE.clone(), SEGMENT_JITTER_MS_DOC)
        .define(SEGMENT_INDEX_BYTES, INT_NOT_NEGATIVE.clone(), SEGMENT_INDEX_BYTES_DOC)
        .define(FLUSH_MESSAGES, LONG_NOT_NEGATIVE.clone(), FLUSH_MESSAGES_DOC)
        .define(FLUSH_MS, LONG_NOT_NEGATIVE.clone(), FLUSH_MS_DOC)
        // May be negative, which disables size based retention.
        .define(RETENTION_BYTES, LONG.clone(), RETENTION_BYTES_DOC)
        .define(RETENTION_MS, LONG_NOT_NEGATIVE.clone(), RETENTION_MS_DOC)
        .define(MAX_MESSAGE_BYTES, INT_NOT_NEGATIVE.clone(), MAX_MESSAGE_BYTES_DOC)
        .define(INDEX_INTERVAL_BYTES, INT_NOT_NEGATIVE.clone(), INDEX_INTERVAL_BYTES_DOC)
        .define(DELETE_RETENTION_MS, LONG_NOT_NEGATIVE.clone(), DELETE_RETENTION_MS_DOC)
        .define(FILE_DELETE_DELAY_MS, LONG_NOT_NEGATIVE.clone(), FILE_DELETE_DELAY_MS_DOC)
        .define(MIN_CLEANABLE_DIRTY_RATIO, DOUBLE_0_1.clone(), MIN_CLEANABLE_DIRTY_RATIO_DOC)
        .define(CLEANUP_POLICY, Validator::tokens("delete compact compact,delete delete,compact"), CLEANUP_POLICY_DOC)
        .define(UNCLEAN_LEADER_ELECTION_ENABLE, BOOLEAN.clone(), UNCLEAN_LEADER_ELECTION_ENABLE_DOC)
        .define(MIN_INSYNC_REPLICAS, INT_1_OR_MORE.clone(), MIN_INSYNC_REPLICAS_DOC)
        .define(COMPRESSION_TYPE, Validator::tokens("producer gzip snappy lz4 uncompressed"), COMPRESSION_TYPE_DOC)
        .define(PREALLOCATE, BOOLEAN.clone(), PREALLOCATE_DOC)
        .define(
            MESSAGE_FORMAT_VERSION,
            Validator::tokens("0.8.0 0.8.1 0.8.2 0.9.0 0.10.0-IV0 0.10.0-IV1 0.10.0 0.10.1-IV0"),
            MESSAGE_FORMAT_VERSION_DOC,
        )
        .define(MESSAGE_TIMESTAMP_TYPE, Validator::tokens("CreateTime LogAppendTime"), MESSAGE_TIMESTAMP_TYPE_DOC)
        .define(MESSAGE_TIMESTAMP_DIFFERENCE_MAX_MS, LONG_NOT_NEGATIVE.clone(), MESSAGE_TIMESTAMP_DIFFERENCE_MAX_MS_DOC);
}
