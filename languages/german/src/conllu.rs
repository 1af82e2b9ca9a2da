use std::collections::BTreeMap;

/// One syntactic word of a CoNLL-U sentence
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConlluToken {
    /// 1-based position in the sentence
    pub id: usize,
    pub form: String,
    pub lemma: String,
    pub upos: String,
    pub xpos: String,
    pub feats: BTreeMap<String, String>,
    /// Id of the governing token, 0 for the root
    pub head: usize,
    pub deprel: String,
}

#[derive(Debug, thiserror::Error)]
pub enum ConlluError {
    #[error("Line {line}: expected 10 columns, found {found}")]
    Columns { line: usize, found: usize },

    #[error("Line {line}: invalid token id '{id}'")]
    InvalidId { line: usize, id: String },

    #[error("Line {line}: invalid head '{head}'")]
    InvalidHead { line: usize, head: String },
}

/// Decode CoNLL-U text into sentences of tokens.
///
/// Comment lines, multi-word token ranges (`1-2`) and empty nodes (`1.1`)
/// are skipped; a blank line ends a sentence.
pub fn parse_conllu(text: &str) -> Result<Vec<Vec<ConlluToken>>, ConlluError> {
    let mut sentences = Vec::new();
    let mut current = Vec::new();

    for (index, raw) in text.lines().enumerate() {
        let line_no = index + 1;
        let line = raw.trim_end_matches('\r');

        if line.trim().is_empty() {
            if !current.is_empty() {
                sentences.push(std::mem::take(&mut current));
            }
            continue;
        }

        if line.starts_with('#') {
            continue;
        }

        let columns: Vec<&str> = line.split('\t').collect();
        if columns.len() != 10 {
            return Err(ConlluError::Columns {
                line: line_no,
                found: columns.len(),
            });
        }

        let id_field = columns[0];
        if id_field.contains('-') || id_field.contains('.') {
            continue;
        }

        let id = id_field.parse().map_err(|_| ConlluError::InvalidId {
            line: line_no,
            id: id_field.to_string(),
        })?;

        let head = match columns[6] {
            "_" => 0,
            value => value.parse().map_err(|_| ConlluError::InvalidHead {
                line: line_no,
                head: value.to_string(),
            })?,
        };

        current.push(ConlluToken {
            id,
            form: columns[1].to_string(),
            lemma: columns[2].to_string(),
            upos: columns[3].to_string(),
            xpos: columns[4].to_string(),
            feats: parse_feats(columns[5]),
            head,
            deprel: columns[7].to_string(),
        });
    }

    if !current.is_empty() {
        sentences.push(current);
    }

    Ok(sentences)
}

fn parse_feats(field: &str) -> BTreeMap<String, String> {
    if field == "_" {
        return BTreeMap::new();
    }

    field
        .split('|')
        .filter_map(|pair| pair.split_once('='))
        .map(|(name, value)| (name.to_string(), value.to_string()))
        .collect()
}

#[cfg(test)]
pub(crate) mod fixtures {
    /// "Er stellte seinen Freund vor."
    pub const SEPARABLE: &str = "# sent_id = 1\n\
# text = Er stellte seinen Freund vor.\n\
1\tEr\ter\tPRON\tPPER\tCase=Nom|Gender=Masc|Number=Sing|Person=3|PronType=Prs\t2\tnsubj\t_\t_\n\
2\tstellte\tstellen\tVERB\tVVFIN\tMood=Ind|Number=Sing|Person=3|Tense=Past|VerbForm=Fin\t0\troot\t_\t_\n\
3\tseinen\tsein\tDET\tPPOSAT\tCase=Acc|Gender=Masc|Number=Sing|Poss=Yes|PronType=Prs\t4\tdet:poss\t_\t_\n\
4\tFreund\tFreund\tNOUN\tNN\tCase=Acc|Gender=Masc|Number=Sing\t2\tobj\t_\t_\n\
5\tvor\tvor\tADP\tPTKVZ\t_\t2\tcompound:prt\t_\tSpaceAfter=No\n\
6\t.\t.\tPUNCT\t$.\t_\t2\tpunct\t_\t_\n\
\n";

    /// "Ich stelle mich vor."
    pub const REFLEXIVE_SEPARABLE: &str = "# text = Ich stelle mich vor.\n\
1\tIch\tich\tPRON\tPPER\tCase=Nom|Number=Sing|Person=1|PronType=Prs\t2\tnsubj\t_\t_\n\
2\tstelle\tstellen\tVERB\tVVFIN\tMood=Ind|Number=Sing|Person=1|Tense=Pres|VerbForm=Fin\t0\troot\t_\t_\n\
3\tmich\tich\tPRON\tPRF\tCase=Acc|Number=Sing|Person=1|PronType=Prs|Reflex=Yes\t2\texpl:pv\t_\t_\n\
4\tvor\tvor\tADP\tPTKVZ\t_\t2\tcompound:prt\t_\tSpaceAfter=No\n\
5\t.\t.\tPUNCT\t$.\t_\t2\tpunct\t_\t_\n\
\n";

    /// "Die Tür war geschlossen, und er freute sich."
    pub const ARTICLE_ADJECTIVE_REFLEXIVE: &str = "# text = Die Tür war geschlossen, und er freute sich.\n\
1\tDie\tder\tDET\tART\tCase=Nom|Definite=Def|Gender=Fem|Number=Sing|PronType=Art\t2\tdet\t_\t_\n\
2\tTür\tTür\tNOUN\tNN\tCase=Nom|Gender=Fem|Number=Sing\t4\tnsubj\t_\t_\n\
3\twar\tsein\tAUX\tVAFIN\tMood=Ind|Number=Sing|Person=3|Tense=Past|VerbForm=Fin\t4\tcop\t_\t_\n\
4\tgeschlossen\tgeschlossen\tADJ\tADJD\tDegree=Pos\t0\troot\t_\tSpaceAfter=No\n\
5\t,\t,\tPUNCT\t$,\t_\t8\tpunct\t_\t_\n\
6\tund\tund\tCCONJ\tKON\t_\t8\tcc\t_\t_\n\
7\ter\ter\tPRON\tPPER\tCase=Nom|Gender=Masc|Number=Sing|Person=3|PronType=Prs\t8\tnsubj\t_\t_\n\
8\tfreute\tfreuen\tVERB\tVVFIN\tMood=Ind|Number=Sing|Person=3|Tense=Past|VerbForm=Fin\t4\tconj\t_\t_\n\
9\tsich\ter\tPRON\tPRF\tCase=Acc|Number=Sing|Person=3|PronType=Prs|Reflex=Yes\t8\tobj\t_\tSpaceAfter=No\n\
10\t.\t.\tPUNCT\t$.\t_\t4\tpunct\t_\t_\n\
\n";
}
