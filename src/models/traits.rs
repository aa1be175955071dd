use crate::models::observation::Observation;
use crate::models::record::MatchContext;

/// 型付きログを入力とする解析器の基本インターフェース
///
/// 解析器は入力だけに依存する純粋関数として振る舞い、
/// 呼び出しをまたいで状態を保持しません。
pub trait VisionAnalyzer {
    /// 解析結果のレポート型
    type Report;

    /// 解析器名（ログ出力用）
    fn name(&self) -> &'static str;

    /// ログ全体を解析してレポートを作成
    fn analyze(&self, log: &[Observation], context: &MatchContext) -> Self::Report;
}
