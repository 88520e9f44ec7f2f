// GraphQL documents understood by the registration backend

pub const CREATE_USER_INFO: &str = r#"mutation CreateUserInfo($input: CreateUserInfoInput!) {
  createUserInfo(input: $input) {
    companyid
    userid
  }
}"#;

pub const DETECT_TEXT_IN_ID_CARD: &str = r#"query Detecttextinidcard($imageDataBase64: String!) {
  detecttextinidcard(imageDataBase64: $imageDataBase64) {
    DetectedText
  }
}"#;

pub const REGISTER_NEW_USER_WITH_ID_CARD: &str = r#"mutation Registernewuserwithidcard(
  $userInfoAsJson: String!
  $faceImageDataBase64: String!
  $idImageDataBase64: String!
) {
  registernewuserwithidcard(
    userInfoAsJson: $userInfoAsJson
    faceImageDataBase64: $faceImageDataBase64
    idImageDataBase64: $idImageDataBase64
  ) {
    Success
    Message
  }
}"#;

pub const DELETE_USER: &str = r#"mutation Deleteuser($userInfoAsJson: String!) {
  deleteuser(userInfoAsJson: $userInfoAsJson)
}"#;
