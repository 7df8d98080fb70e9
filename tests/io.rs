extern crate rhetoric;

mod test_utils;

use std::io::BufReader;

use rhetoric::dataset::Token;
use rhetoric::io::serialize::Serializer;
use rhetoric::io::{Read, Reader};
use rhetoric::syntax::transition::Action;
use rhetoric::tree::Form;

#[test]
fn test_reader_reads_tokens() {
    let text = test_utils::mock_conll_text();
    let mut reader: Reader<_, Token> = Reader::new(BufReader::new(text.as_bytes()));
    let mut tokens = vec![];
    let count = reader.read(&mut tokens).unwrap();
    assert_eq!(count, 24);
    assert_eq!(tokens.len(), 24);
    assert_eq!(tokens[1].word(), "cat");
}

#[test]
fn test_reader_read_upto() {
    let text = test_utils::mock_conll_text();
    let mut reader: Reader<_, Token> = Reader::new(BufReader::new(text.as_bytes()));
    let mut tokens = vec![];
    assert_eq!(reader.read_upto(5, &mut tokens).unwrap(), 5);
    assert_eq!(tokens.len(), 5);
    assert_eq!(reader.read_upto(100, &mut tokens).unwrap(), 19);
    assert_eq!(tokens.len(), 24);
}

#[test]
fn test_serializer_roundtrip() {
    let actions = vec![
        Action::Shift,
        Action::Reduce(Form::NS, "elaboration".to_string()),
        Action::Reduce(Form::NN, "List".to_string()),
    ];
    let mut buf = vec![];
    {
        let mut writer: Serializer<_, Action> = Serializer::new(&mut buf);
        assert_eq!(writer.write(&actions).unwrap(), 3);
    }
    assert_eq!(buf.iter().filter(|&&b| b == b'\n').count(), 3);
    let mut reader: Serializer<_, Action> = Serializer::new(&buf[..]);
    let mut decoded = vec![];
    assert_eq!(reader.read(&mut decoded).unwrap(), 3);
    assert_eq!(decoded, actions);
}
