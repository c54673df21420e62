use tracing::debug;

use crate::error::BridgeResult;
use crate::eth::{BlockReference, BlockTag};
use crate::qtum::NodeClient;

/// Resolve an Ethereum block parameter to a Qtum block height.
///
/// `latest`, `safe`, `finalized` and `pending` all map to the current tip;
/// Qtum has no pending block and finalizes by depth. Node failures are
/// returned as upstream errors.
pub async fn resolve_block_number(
    node: &dyn NodeClient,
    block: &BlockReference,
) -> BridgeResult<u64> {
    let height = match block {
        BlockReference::Tag(BlockTag::Earliest) => 0,
        BlockReference::Tag(_) => node.get_block_count().await?,
        BlockReference::Number(number) => *number,
        BlockReference::Hash(hash) => node.get_block_height(hash).await?,
    };
    debug!("resolved block {:?} -> {}", block, height);
    Ok(height)
}
