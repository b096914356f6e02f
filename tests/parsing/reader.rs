#[cfg(test)]
mod verify {
    use xilize::parsing::{Markers, RawBlock, Reader};

    fn texts(block: &RawBlock) -> Vec<&str> {
        block
            .lines
            .iter()
            .map(|line| {
                line.text
                    .as_str()
            })
            .collect()
    }

    #[test]
    fn document_segments_into_blocks() {
        let content = "\
h1. Title

>xil> a comment between blocks
First paragraph
continues here.


div. {{
p. nested
}}
";
        let blocks: Vec<RawBlock> = Reader::new(content, Markers::default()).collect();
        assert_eq!(blocks.len(), 5);

        assert_eq!(texts(&blocks[0]), vec!["h1. Title"]);
        assert_eq!(blocks[0].number, 1);

        assert_eq!(
            texts(&blocks[1]),
            vec!["First paragraph", "continues here."]
        );
        assert_eq!(blocks[1].number, 4);
        assert_eq!(blocks[1].trailing, 2);

        assert!(blocks[2].start);
        assert_eq!(texts(&blocks[2]), vec!["div."]);
        assert_eq!(texts(&blocks[3]), vec!["p. nested"]);
        assert!(blocks[4].end);
    }

    #[test]
    fn empty_input_has_no_blocks() {
        assert_eq!(
            Reader::new("", Markers::default()).count(),
            0
        );
        assert_eq!(
            Reader::new("\n\n   \n", Markers::default()).count(),
            0
        );
    }
}
