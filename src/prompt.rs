use crate::models::AnalyzeRequest;

/// Build the analysis prompt. Deterministic: the same request always
/// produces the same string, which is what makes response caching safe.
pub fn build_prompt(req: &AnalyzeRequest) -> String {
    let mut prompt = format!(
        "You are a local SEO specialist. A business in {city}, {state} wants to rank \
         for the keyword \"{keyword}\".\n\n\
         The page currently ranking at the top of the results is:\n{top_url}\n\n\
         The business's own page, which ranks lower, is:\n{target_url}\n\n\
         Compare the two pages and produce a gap analysis: what the top-ranking page \
         covers that the lower page does not, which sections or topics are missing, \
         and what on-page changes would close the gap for this keyword in this market.",
        city = req.city.trim(),
        state = req.state.trim(),
        keyword = req.keyword.trim(),
        top_url = req.top_url.trim(),
        target_url = req.target_url.trim(),
    );

    if req.include_rewrite {
        prompt.push_str(
            "\n\nThen write a complete rewritten draft of the lower-ranking page's \
             content that closes those gaps, keeping the business's local focus.",
        );
    }

    prompt
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(include_rewrite: bool) -> AnalyzeRequest {
        AnalyzeRequest {
            keyword: "roof repair".into(),
            city: "Denver".into(),
            state: "CO".into(),
            top_url: "https://top.example/roofing".into(),
            target_url: "https://me.example/roofs".into(),
            include_rewrite,
        }
    }

    #[test]
    fn prompt_includes_every_field() {
        let prompt = build_prompt(&request(false));
        assert!(prompt.contains("roof repair"));
        assert!(prompt.contains("Denver"));
        assert!(prompt.contains("CO"));
        assert!(prompt.contains("https://top.example/roofing"));
        assert!(prompt.contains("https://me.example/roofs"));
    }

    #[test]
    fn prompt_is_deterministic() {
        assert_eq!(build_prompt(&request(true)), build_prompt(&request(true)));
    }

    #[test]
    fn rewrite_section_is_opt_in() {
        assert!(!build_prompt(&request(false)).contains("rewritten draft"));
        assert!(build_prompt(&request(true)).contains("rewritten draft"));
    }

    #[test]
    fn fields_are_trimmed() {
        let mut req = request(false);
        req.keyword = "  roof repair  ".into();
        let prompt = build_prompt(&req);
        assert!(prompt.contains("\"roof repair\""));
    }
}
