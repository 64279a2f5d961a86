/// 展示用文件名的默认最大字符数
pub const DEFAULT_DISPLAY_NAME_LIMIT: usize = 20;

const ELLIPSIS: &str = "...";

/// 缩短过长的文件名用于展示：超过 `limit` 个字符时截断并以 `...` 结尾。
///
/// 按字符而不是字节截断，不会切开多字节字符。
pub fn resize_file_name(name: &str, limit: usize) -> String {
    if name.chars().count() <= limit {
        return name.to_string();
    }
    let keep = limit.saturating_sub(ELLIPSIS.len());
    let mut resized: String = name.chars().take(keep).collect();
    resized.push_str(ELLIPSIS);
    resized
}
