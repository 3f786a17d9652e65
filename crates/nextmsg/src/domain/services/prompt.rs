//! Prompt construction for the rewrite model
//!
//! The system instruction fixes persona, chat-style rules and the three-tone
//! output; the per-request prompt carries relationship, draft and, for
//! replies, the received message.

use crate::domain::entities::RewriteRequest;

/// System instruction sent with every rewrite
pub const SYSTEM_INSTRUCTION: &str = "\
あなたはチャットメッセージ最適化AI「NextMsg AI」です。ユーザーが入力したラフな下書きを、指定された相手との関係性に合わせて、LINEなどのチャットツールに最適な形にリライトします。

【ルール】
1. 「お世話になっております」「〜と存じます」のような、ビジネスメールの定型句は使わないでください。
2. チャットでのやり取りを想定し、テンポが良く画面上で読みやすい短めの文章にしてください。
3. 句読点は固くなりすぎないよう、改行・絵文字・感嘆符などを適度に使い、今のチャット文化に沿った自然な表現にしてください。
4. 相手との心の距離感（関係性）を正確に反映してください。
5. 次の3つのトーンで出力してください。
   - Soft: 敬語は使うが堅苦しくない、相手への配慮が感じられる表現。
   - Standard: その関係性での標準的な距離感。
   - Short: 要件をスマートに伝える。冷たくならない程度の短さ。
6. 返信の場合は、相手のメッセージのテンション・絵文字の有無・文章の長さに同調（ミラーリング）しつつ、下書きの意図を伝えてください。
7. 出力は必ず指定されたJSONスキーマに従ってください。";

/// Appended to reply prompts so the model mirrors the received message
pub const MIRRORING_INSTRUCTION: &str =
    "※相手のメッセージのテンションや絵文字の使い方に同調して返信を作成してください。";

/// Build the user prompt for a single relationship
pub fn build_prompt(request: &RewriteRequest) -> String {
    let relationship = request.relationship.label();

    match request.reply_context() {
        Some(received) => format!(
            "【関係性】: {}\n【相手からのメッセージ】: {}\n【返信の下書き】: {}\n\n{}",
            relationship, received, request.draft, MIRRORING_INSTRUCTION
        ),
        None => format!("【関係性】: {}\n【下書き】: {}", relationship, request.draft),
    }
}
